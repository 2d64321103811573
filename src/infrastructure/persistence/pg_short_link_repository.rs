//! PostgreSQL implementation of the short link repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::ShortLink;
use crate::domain::repositories::ShortLinkRepository;
use crate::error::AppError;
use crate::utils::db_error::is_unique_violation_on_code;

/// PostgreSQL repository for short link storage and retrieval.
///
/// Short-code uniqueness is enforced by the `short_links_short_code_key`
/// constraint; a violating insert is reported as
/// [`AppError::ShortCodeAlreadyExists`].
pub struct PgShortLinkRepository {
    pool: Arc<PgPool>,
}

impl PgShortLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ShortLinkRepository for PgShortLinkRepository {
    async fn get_by_code(&self, short_code: &str) -> Result<Option<ShortLink>, AppError> {
        let link = sqlx::query_as::<_, ShortLink>(
            r#"
            SELECT id, original_url, short_code, created_at, expires_at, click_count, created_by_ip
            FROM short_links
            WHERE short_code = $1
            "#,
        )
        .bind(short_code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(link)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<ShortLink>, AppError> {
        let link = sqlx::query_as::<_, ShortLink>(
            r#"
            SELECT id, original_url, short_code, created_at, expires_at, click_count, created_by_ip
            FROM short_links
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(link)
    }

    async fn create(&self, link: ShortLink) -> Result<ShortLink, AppError> {
        sqlx::query_as::<_, ShortLink>(
            r#"
            INSERT INTO short_links
                (id, original_url, short_code, created_at, expires_at, click_count, created_by_ip)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, original_url, short_code, created_at, expires_at, click_count, created_by_ip
            "#,
        )
        .bind(link.id)
        .bind(&link.original_url)
        .bind(&link.short_code)
        .bind(link.created_at)
        .bind(link.expires_at)
        .bind(link.click_count)
        .bind(&link.created_by_ip)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(|e| {
            if is_unique_violation_on_code(&e) {
                AppError::ShortCodeAlreadyExists(link.short_code.clone())
            } else {
                AppError::Database(e)
            }
        })
    }

    async fn update(&self, link: ShortLink) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE short_links
            SET click_count = $2, expires_at = $3
            WHERE id = $1
            "#,
        )
        .bind(link.id)
        .bind(link.click_count)
        .bind(link.expires_at)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM short_links WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn exists_by_code(&self, short_code: &str) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM short_links WHERE short_code = $1)",
        )
        .bind(short_code)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(exists)
    }

    async fn list_paged(
        &self,
        page_number: u32,
        page_size: u32,
    ) -> Result<Vec<ShortLink>, AppError> {
        let limit = i64::from(page_size);
        let offset = i64::from(page_number.saturating_sub(1)) * limit;

        let links = sqlx::query_as::<_, ShortLink>(
            r#"
            SELECT id, original_url, short_code, created_at, expires_at, click_count, created_by_ip
            FROM short_links
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(links)
    }

    async fn health_check(&self) -> bool {
        match sqlx::query("SELECT 1").execute(self.pool.as_ref()).await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Database health check failed");
                false
            }
        }
    }
}
