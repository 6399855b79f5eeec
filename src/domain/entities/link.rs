//! Link entity: a short code owned by a user, pointing at a full URL.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A shortened URL and its click counter.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Link {
    pub id: i64,
    pub full_version: String,
    pub short_version: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub clicked: i64,
    pub user_id: Uuid,
}

impl Link {
    /// Returns true if `subject_id` owns this link.
    pub fn is_owned_by(&self, subject_id: &str) -> bool {
        Uuid::parse_str(subject_id).is_ok_and(|id| id == self.user_id)
    }

    /// Public URL of the short link under `base_url`.
    pub fn short_url(&self, base_url: &str) -> String {
        format!("{}/s/{}", base_url.trim_end_matches('/'), self.short_version)
    }
}

/// Input data for creating a new link.
#[derive(Debug, Clone)]
pub struct NewLink {
    pub full_version: String,
    pub short_version: String,
    pub description: Option<String>,
    pub user_id: Uuid,
}

/// Partial update for an existing link.
///
/// `None` fields are left unchanged.
/// `description: Some(None)` clears the description; `Some(Some(d))` sets it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkPatch {
    pub full_version: Option<String>,
    pub description: Option<Option<String>>,
}

impl LinkPatch {
    pub fn is_empty(&self) -> bool {
        self.full_version.is_none() && self.description.is_none()
    }
}
