//! Domain layer: entities, repository contracts and the token error taxonomy.
//!
//! - [`entities`] - core data structures
//! - [`repositories`] - data access traits, implemented in
//!   `crate::infrastructure::persistence`
//! - [`errors`] - [`errors::TokenError`]
//!
//! Nothing here depends on the HTTP or storage layers except through
//! [`crate::error::AppError`].

pub mod entities;
pub mod errors;
pub mod repositories;
