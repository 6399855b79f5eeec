//! Business logic services for the application layer.

pub mod link_service;
pub mod token_service;
pub mod user_service;

pub use link_service::{LinkService, LinkTotals};
pub use token_service::{SessionTokens, TokenService, TokenSettings};
pub use user_service::{ProfileUpdate, UserService};

use uuid::Uuid;

use crate::error::AppError;

/// Parses an authenticated subject into a user id.
///
/// Subjects are minted from user ids, so a non-UUID subject can only come
/// from a token this service did not mean to accept.
pub(crate) fn subject_uuid(subject_id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(subject_id).map_err(|_| AppError::invalid_credentials())
}
