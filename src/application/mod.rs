//! Application layer services implementing business logic.
//!
//! Services consume repository traits and provide a clean API for HTTP
//! handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::TokenService`] - session tokens and refresh rotation
//! - [`services::UserService`] - accounts and credentials
//! - [`services::LinkService`] - short links and redirects

pub mod services;
