//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{Link, LinkPatch, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

const LINK_COLUMNS: &str =
    "id, full_version, short_version, description, created_at, clicked, user_id";

/// PostgreSQL repository for link storage and retrieval.
///
/// All statements are parameterized.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let sql = format!(
            "INSERT INTO links (full_version, short_version, description, user_id) \
             VALUES ($1, $2, $3, $4) RETURNING {LINK_COLUMNS}"
        );

        Ok(sqlx::query_as::<_, Link>(&sql)
            .bind(&new_link.full_version)
            .bind(&new_link.short_version)
            .bind(&new_link.description)
            .bind(new_link.user_id)
            .fetch_one(self.pool.as_ref())
            .await?)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Link>, AppError> {
        let sql = format!("SELECT {LINK_COLUMNS} FROM links WHERE id = $1");

        Ok(sqlx::query_as::<_, Link>(&sql)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?)
    }

    async fn find_by_short(&self, short_version: &str) -> Result<Option<Link>, AppError> {
        let sql = format!("SELECT {LINK_COLUMNS} FROM links WHERE short_version = $1");

        Ok(sqlx::query_as::<_, Link>(&sql)
            .bind(short_version)
            .fetch_optional(self.pool.as_ref())
            .await?)
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Link>, AppError> {
        let sql = format!(
            "SELECT {LINK_COLUMNS} FROM links WHERE user_id = $1 \
             ORDER BY created_at DESC, id DESC"
        );

        Ok(sqlx::query_as::<_, Link>(&sql)
            .bind(user_id)
            .fetch_all(self.pool.as_ref())
            .await?)
    }

    async fn update(&self, id: i64, patch: LinkPatch) -> Result<Link, AppError> {
        let sql = format!(
            "UPDATE links SET \
                full_version = COALESCE($2, full_version), \
                description = CASE WHEN $3 THEN $4 ELSE description END \
             WHERE id = $1 RETURNING {LINK_COLUMNS}"
        );

        sqlx::query_as::<_, Link>(&sql)
            .bind(id)
            .bind(patch.full_version)
            .bind(patch.description.is_some())
            .bind(patch.description.flatten())
            .fetch_optional(self.pool.as_ref())
            .await?
            .ok_or_else(|| AppError::not_found("Link not found", json!({ "id": id })))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM links WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn register_click(&self, short_version: &str) -> Result<Option<String>, AppError> {
        Ok(sqlx::query_scalar::<_, String>(
            "UPDATE links SET clicked = clicked + 1 \
             WHERE short_version = $1 RETURNING full_version",
        )
        .bind(short_version)
        .fetch_optional(self.pool.as_ref())
        .await?)
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM links")
            .fetch_one(self.pool.as_ref())
            .await?)
    }

    async fn total_clicks(&self) -> Result<i64, AppError> {
        Ok(
            sqlx::query_scalar::<_, i64>("SELECT COALESCE(SUM(clicked), 0)::BIGINT FROM links")
                .fetch_one(self.pool.as_ref())
                .await?,
        )
    }
}
