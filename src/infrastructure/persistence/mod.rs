//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx runtime
//! queries. Schema lives in `migrations/`.
//!
//! # Repositories
//!
//! - [`PgUserRepository`] - account storage
//! - [`PgLinkRepository`] - link storage, lookups and click counting

pub mod pg_link_repository;
pub mod pg_user_repository;

pub use pg_link_repository::PgLinkRepository;
pub use pg_user_repository::PgUserRepository;
