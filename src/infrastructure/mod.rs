//! Infrastructure layer for external integrations.
//!
//! # Modules
//!
//! - [`cache`] - in-process refresh-token cache
//! - [`clock`] - time source abstraction
//! - [`persistence`] - PostgreSQL repository implementations
//! - [`token`] - token signing and verification

pub mod cache;
pub mod clock;
pub mod persistence;
pub mod token;
