//! Account registration, credential checks and profile management.

use serde_json::json;
use std::sync::{Arc, OnceLock};
use tracing::info;

use super::subject_uuid;
use crate::domain::entities::{NewUser, User, UserPatch};
use crate::domain::repositories::UserRepository;
use crate::error::AppError;
use crate::utils::password::{hash_password, verify_password};

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Changes requested through the profile endpoint.
///
/// A password change needs both passwords.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub old_password: Option<String>,
    pub new_password: Option<String>,
}

/// Service for user accounts.
///
/// Argon2 hashing runs on the blocking pool so it never stalls the runtime.
pub struct UserService<R: UserRepository + ?Sized> {
    repository: Arc<R>,
}

impl<R: UserRepository + ?Sized> UserService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Registers a new account.
    ///
    /// The email is stored lowercased.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the email is already registered.
    pub async fn signup(&self, name: &str, email: &str, password: &str) -> Result<User, AppError> {
        let email = normalize_email(email);

        if self.repository.find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict(
                "Email is already registered",
                json!({ "email": email }),
            ));
        }

        let password_hash = hash_blocking(password.to_string()).await?;
        let user = self
            .repository
            .create(NewUser {
                name: name.trim().to_string(),
                email,
                password_hash,
            })
            .await?;

        info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Checks an email/password pair.
    ///
    /// # Errors
    ///
    /// Returns the generic [`AppError::Unauthorized`] for an unknown email and
    /// for a wrong password alike. An unknown email still pays for one Argon2
    /// verification so response times do not reveal which accounts exist.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, AppError> {
        let email = normalize_email(email);

        let Some(user) = self.repository.find_by_email(&email).await? else {
            verify_blocking(password.to_string(), dummy_hash().await?).await?;
            return Err(AppError::invalid_credentials());
        };

        if !verify_blocking(password.to_string(), user.password_hash.clone()).await? {
            return Err(AppError::invalid_credentials());
        }

        Ok(user)
    }

    /// Loads the account behind an authenticated subject.
    pub async fn get(&self, subject_id: &str) -> Result<User, AppError> {
        let id = subject_uuid(subject_id)?;

        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found", json!({ "id": id })))
    }

    /// Applies a profile update.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if nothing would change, if only one of
    /// the two passwords is given, if the old password is wrong, or if the new
    /// password is too short or equal to the old one.
    /// Returns [`AppError::Conflict`] if the new email is taken.
    pub async fn update_profile(
        &self,
        subject_id: &str,
        update: ProfileUpdate,
    ) -> Result<User, AppError> {
        let user = self.get(subject_id).await?;

        let mut patch = UserPatch {
            name: update.name.map(|n| n.trim().to_string()),
            email: update.email.as_deref().map(normalize_email),
            password_hash: None,
        };

        match (update.old_password, update.new_password) {
            (None, None) => {}
            (Some(old), Some(new)) => {
                if new.chars().count() < MIN_PASSWORD_LENGTH {
                    return Err(AppError::bad_request(
                        "New password is too short",
                        json!({ "min_length": MIN_PASSWORD_LENGTH }),
                    ));
                }
                if old == new {
                    return Err(AppError::bad_request(
                        "New password must differ from the old one",
                        json!({}),
                    ));
                }
                if !verify_blocking(old, user.password_hash.clone()).await? {
                    return Err(AppError::bad_request("Old password is incorrect", json!({})));
                }
                patch.password_hash = Some(hash_blocking(new).await?);
            }
            _ => {
                return Err(AppError::bad_request(
                    "Both old_password and new_password are required to change the password",
                    json!({}),
                ));
            }
        }

        if patch.is_empty() {
            return Err(AppError::bad_request("Nothing to update", json!({})));
        }

        let updated = self.repository.update(user.id, patch).await?;
        info!(user_id = %updated.id, "Profile updated");
        Ok(updated)
    }

    /// Deletes the account of `subject_id` together with its links.
    pub async fn delete(&self, subject_id: &str) -> Result<(), AppError> {
        let id = subject_uuid(subject_id)?;

        if !self.repository.delete(id).await? {
            return Err(AppError::not_found("User not found", json!({ "id": id })));
        }

        info!(user_id = %id, "User deleted");
        Ok(())
    }

    /// Deletes an account by email. Used by the admin CLI.
    pub async fn delete_by_email(&self, email: &str) -> Result<User, AppError> {
        let email = normalize_email(email);

        let user = self
            .repository
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AppError::not_found("User not found", json!({ "email": email })))?;

        self.repository.delete(user.id).await?;
        info!(user_id = %user.id, "User deleted");
        Ok(user)
    }

    pub async fn list(&self) -> Result<Vec<User>, AppError> {
        self.repository.list().await
    }

    pub async fn count(&self) -> Result<i64, AppError> {
        self.repository.count().await
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

async fn hash_blocking(password: String) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::internal("Password hashing failed", json!({ "reason": e.to_string() })))?
}

static DUMMY_HASH: OnceLock<String> = OnceLock::new();

/// PHC hash of a throwaway password, computed once with the same Argon2
/// parameters as real accounts.
async fn dummy_hash() -> Result<String, AppError> {
    if let Some(hash) = DUMMY_HASH.get() {
        return Ok(hash.clone());
    }

    let hash = hash_blocking("shortly-no-such-account".to_string()).await?;
    Ok(DUMMY_HASH.get_or_init(|| hash).clone())
}

async fn verify_blocking(password: String, hash: String) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| AppError::internal("Password check failed", json!({ "reason": e.to_string() })))
}
