//! Repository trait for user accounts.

use crate::domain::entities::{NewUser, User, UserPatch};
use crate::error::AppError;
use async_trait::async_trait;
use uuid::Uuid;

/// Repository interface for user accounts.
///
/// Emails are unique and compared case-insensitively by callers, which
/// lowercase them before storage and lookup.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUserRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts a new account.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the email is already registered.
    async fn create(&self, new_user: NewUser) -> Result<User, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Applies a partial update and returns the updated row.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the user does not exist.
    /// Returns [`AppError::Conflict`] if the new email is taken.
    async fn update(&self, id: Uuid, patch: UserPatch) -> Result<User, AppError>;

    /// Deletes the account and, by cascade, its links.
    ///
    /// Returns `Ok(false)` if the user did not exist.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;

    /// All accounts, oldest first.
    async fn list(&self) -> Result<Vec<User>, AppError>;

    async fn count(&self) -> Result<i64, AppError>;
}
