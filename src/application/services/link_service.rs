//! Link creation, ownership-checked management and redirect resolution.

use metrics::counter;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info};

use super::subject_uuid;
use crate::domain::entities::{Link, LinkPatch, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::generate_code;
use crate::utils::url_normalizer::normalize_url;

/// Aggregate counters reported by the admin CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkTotals {
    pub links: i64,
    pub clicks: i64,
}

/// Service for creating and managing shortened links.
///
/// Every operation on an existing link is scoped to its owner: links of other
/// users are reported as not found.
pub struct LinkService<R: LinkRepository + ?Sized> {
    repository: Arc<R>,
}

impl<R: LinkRepository + ?Sized> LinkService<R> {
    /// Creates a new link service.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Shortens `full_version` on behalf of `subject_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the URL is not an absolute http(s) URL.
    /// Returns [`AppError::Internal`] if no free code was found.
    pub async fn create(
        &self,
        subject_id: &str,
        full_version: &str,
        description: Option<String>,
    ) -> Result<Link, AppError> {
        let user_id = subject_uuid(subject_id)?;
        let full_version = normalize_target(full_version)?;
        let short_version = self.generate_unique_code().await?;

        let link = self
            .repository
            .create(NewLink {
                full_version,
                short_version,
                description: clean_description(description),
                user_id,
            })
            .await?;

        info!(link_id = link.id, short = %link.short_version, "Link created");
        Ok(link)
    }

    /// The caller's links, newest first.
    pub async fn list(&self, subject_id: &str) -> Result<Vec<Link>, AppError> {
        let user_id = subject_uuid(subject_id)?;
        self.repository.list_by_user(user_id).await
    }

    /// Fetches one of the caller's links.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the link does not exist or belongs to
    /// someone else.
    pub async fn get(&self, subject_id: &str, id: i64) -> Result<Link, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .filter(|link| link.is_owned_by(subject_id))
            .ok_or_else(|| link_not_found(id))
    }

    /// Updates the target and/or description of one of the caller's links.
    pub async fn update(
        &self,
        subject_id: &str,
        id: i64,
        patch: LinkPatch,
    ) -> Result<Link, AppError> {
        if patch.is_empty() {
            return Err(AppError::bad_request("Nothing to update", json!({})));
        }

        let patch = LinkPatch {
            full_version: patch
                .full_version
                .as_deref()
                .map(normalize_target)
                .transpose()?,
            description: patch.description.map(clean_description),
        };

        self.get(subject_id, id).await?;
        let link = self.repository.update(id, patch).await?;

        info!(link_id = id, "Link updated");
        Ok(link)
    }

    /// Deletes one of the caller's links.
    pub async fn delete(&self, subject_id: &str, id: i64) -> Result<(), AppError> {
        self.get(subject_id, id).await?;

        if !self.repository.delete(id).await? {
            return Err(link_not_found(id));
        }

        info!(link_id = id, "Link deleted");
        Ok(())
    }

    /// Resolves a short code to its target and counts the click.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for unknown codes.
    pub async fn resolve(&self, short_version: &str) -> Result<String, AppError> {
        let target = self
            .repository
            .register_click(short_version)
            .await?
            .ok_or_else(|| {
                AppError::not_found("Short link not found", json!({ "code": short_version }))
            })?;

        counter!("link_redirects_total").increment(1);
        debug!(short = short_version, "Redirect");
        Ok(target)
    }

    pub async fn totals(&self) -> Result<LinkTotals, AppError> {
        Ok(LinkTotals {
            links: self.repository.count().await?,
            clicks: self.repository.total_clicks().await?,
        })
    }

    /// Generates a free short code, retrying on collision.
    ///
    /// Attempts up to 10 times before failing.
    async fn generate_unique_code(&self) -> Result<String, AppError> {
        const MAX_ATTEMPTS: usize = 10;

        for _ in 0..MAX_ATTEMPTS {
            let code = generate_code();
            if self.repository.find_by_short(&code).await?.is_none() {
                return Ok(code);
            }
        }

        Err(AppError::internal(
            "Failed to generate unique code",
            json!({ "reason": "Too many collisions" }),
        ))
    }
}

fn normalize_target(url: &str) -> Result<String, AppError> {
    normalize_url(url).map_err(|e| {
        AppError::bad_request("Invalid URL format", json!({ "reason": e.to_string() }))
    })
}

fn clean_description(description: Option<String>) -> Option<String> {
    description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}

fn link_not_found(id: i64) -> AppError {
    AppError::not_found("Link not found", json!({ "id": id }))
}
