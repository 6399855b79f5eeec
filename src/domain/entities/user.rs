//! User account entity.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A registered account.
///
/// `id` is the subject identifier carried in issued tokens.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    /// Argon2 PHC string. Never serialized or logged.
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// The subject identifier used in token claims.
    pub fn subject_id(&self) -> String {
        self.id.to_string()
    }
}

/// Input for creating an account. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Partial update of an account; `None` leaves the column unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.password_hash.is_none()
    }
}
