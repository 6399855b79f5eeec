//! DTOs for link management.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::{Link, LinkPatch};

/// Request body for `POST /links`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    #[validate(url(message = "Invalid URL format"))]
    pub full_version: String,

    #[validate(length(max = 500, message = "Description is too long"))]
    pub description: Option<String>,
}

/// Request body for `PATCH /links/{id}`.
///
/// `description` absent leaves it unchanged, `null` clears it.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateLinkRequest {
    #[validate(url(message = "Invalid URL format"))]
    pub full_version: Option<String>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub description: Option<Option<String>>,
}

impl UpdateLinkRequest {
    /// Checks the description length, which the derive cannot reach through
    /// the double option.
    pub fn description_too_long(&self) -> bool {
        self.description
            .as_ref()
            .and_then(Option::as_ref)
            .is_some_and(|d| d.chars().count() > 500)
    }
}

impl From<UpdateLinkRequest> for LinkPatch {
    fn from(request: UpdateLinkRequest) -> Self {
        Self {
            full_version: request.full_version,
            description: request.description,
        }
    }
}

/// JSON representation of a link.
#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub id: i64,
    pub full_version: String,
    pub short_version: String,
    pub short_url: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub clicked: i64,
}

impl LinkResponse {
    pub fn from_link(link: Link, base_url: &str) -> Self {
        Self {
            short_url: link.short_url(base_url),
            id: link.id,
            full_version: link.full_version,
            short_version: link.short_version,
            description: link.description,
            created_at: link.created_at,
            clicked: link.clicked,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_description_absent_vs_null() {
        let absent: UpdateLinkRequest =
            serde_json::from_str(r#"{"full_version":"https://example.com"}"#).unwrap();
        assert_eq!(absent.description, None);

        let null: UpdateLinkRequest = serde_json::from_str(r#"{"description":null}"#).unwrap();
        assert_eq!(null.description, Some(None));

        let set: UpdateLinkRequest = serde_json::from_str(r#"{"description":"docs"}"#).unwrap();
        assert_eq!(set.description, Some(Some("docs".to_string())));
    }

    #[test]
    fn test_create_rejects_relative_url() {
        let request = CreateLinkRequest {
            full_version: "example.com".to_string(),
            description: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_description_length() {
        let request = UpdateLinkRequest {
            full_version: None,
            description: Some(Some("x".repeat(501))),
        };
        assert!(request.description_too_long());
    }
}
