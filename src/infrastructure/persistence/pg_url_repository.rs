//! PostgreSQL implementation of the URL repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::sync::Arc;

use crate::domain::entities::{NewShortUrl, ShortUrl, ShortUrlPatch, UrlStatus};
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;

const COLUMNS: &str = "id, code, title, original_url, original_url_hash, status, clicks, \
     expires_at, created_at, updated_at, deleted_at";

/// PostgreSQL repository for short URL storage.
///
/// Live-row scoping (`deleted_at IS NULL`) is applied in SQL; uniqueness of
/// `code` and `original_url_hash` is enforced by partial unique indexes
/// over live rows (see `migrations/`), which is what arbitrates concurrent
/// creates.
pub struct PgUrlRepository {
    pool: Arc<PgPool>,
}

impl PgUrlRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ShortUrlRow {
    id: i64,
    code: String,
    title: Option<String>,
    original_url: String,
    original_url_hash: String,
    status: String,
    clicks: i64,
    expires_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl TryFrom<ShortUrlRow> for ShortUrl {
    type Error = AppError;

    fn try_from(row: ShortUrlRow) -> Result<Self, Self::Error> {
        let status: UrlStatus = row.status.parse().map_err(|e| {
            AppError::internal(
                "Corrupt status value in store",
                json!({ "id": row.id, "error": format!("{e}") }),
            )
        })?;

        Ok(ShortUrl {
            id: row.id,
            code: row.code,
            title: row.title,
            original_url: row.original_url,
            original_url_hash: row.original_url_hash,
            status,
            clicks: row.clicks,
            expires_at: row.expires_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        })
    }
}

#[async_trait]
impl UrlRepository for PgUrlRepository {
    async fn find_by_code(&self, code: &str) -> Result<Option<ShortUrl>, AppError> {
        let row = sqlx::query_as::<_, ShortUrlRow>(&format!(
            "SELECT {COLUMNS} FROM short_urls WHERE code = $1 AND deleted_at IS NULL"
        ))
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(ShortUrl::try_from).transpose()
    }

    async fn find_by_hash(&self, hash: &str) -> Result<Option<ShortUrl>, AppError> {
        let row = sqlx::query_as::<_, ShortUrlRow>(&format!(
            "SELECT {COLUMNS} FROM short_urls WHERE original_url_hash = $1 AND deleted_at IS NULL"
        ))
        .bind(hash)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(ShortUrl::try_from).transpose()
    }

    async fn find_by_code_with_deleted(&self, code: &str) -> Result<Option<ShortUrl>, AppError> {
        // A reused code can match both a live and a soft-deleted row;
        // prefer the live one.
        let row = sqlx::query_as::<_, ShortUrlRow>(&format!(
            "SELECT {COLUMNS} FROM short_urls WHERE code = $1 \
             ORDER BY deleted_at IS NOT NULL, deleted_at DESC LIMIT 1"
        ))
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(ShortUrl::try_from).transpose()
    }

    async fn exists_by_code(&self, code: &str) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM short_urls WHERE code = $1 AND deleted_at IS NULL)",
        )
        .bind(code)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(exists)
    }

    async fn insert(&self, new_url: NewShortUrl) -> Result<ShortUrl, AppError> {
        let row = sqlx::query_as::<_, ShortUrlRow>(&format!(
            "INSERT INTO short_urls \
                 (code, title, original_url, original_url_hash, status, clicks, expires_at) \
             VALUES ($1, $2, $3, $4, $5, 0, $6) \
             RETURNING {COLUMNS}"
        ))
        .bind(&new_url.code)
        .bind(&new_url.title)
        .bind(&new_url.original_url)
        .bind(&new_url.original_url_hash)
        .bind(new_url.status.as_str())
        .bind(new_url.expires_at)
        .fetch_one(self.pool.as_ref())
        .await?;

        row.try_into()
    }

    async fn update(&self, id: i64, patch: ShortUrlPatch) -> Result<ShortUrl, AppError> {
        if patch.is_empty() {
            return self.find_by_id(id).await?.ok_or_else(|| not_found(id));
        }

        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new("UPDATE short_urls SET updated_at = NOW()");

        if let Some(code) = patch.code {
            qb.push(", code = ").push_bind(code);
        }
        if let Some(title) = patch.title {
            qb.push(", title = ").push_bind(title);
        }
        if let Some(url) = patch.original_url {
            qb.push(", original_url = ").push_bind(url);
        }
        if let Some(hash) = patch.original_url_hash {
            qb.push(", original_url_hash = ").push_bind(hash);
        }
        if let Some(status) = patch.status {
            qb.push(", status = ").push_bind(status.as_str());
        }
        if let Some(expires_at) = patch.expires_at {
            qb.push(", expires_at = ").push_bind(expires_at);
        }

        qb.push(" WHERE id = ")
            .push_bind(id)
            .push(" AND deleted_at IS NULL RETURNING ")
            .push(COLUMNS);

        let row = qb
            .build_query_as::<ShortUrlRow>()
            .fetch_optional(self.pool.as_ref())
            .await?;

        row.ok_or_else(|| not_found(id))?.try_into()
    }

    async fn increment_clicks(&self, id: i64) -> Result<i64, AppError> {
        let clicks: Option<i64> = sqlx::query_scalar(
            "UPDATE short_urls SET clicks = clicks + 1, updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL RETURNING clicks",
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        clicks.ok_or_else(|| not_found(id))
    }

    async fn soft_delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE short_urls SET deleted_at = NOW(), updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM short_urls WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn restore(&self, id: i64) -> Result<Option<ShortUrl>, AppError> {
        let row = sqlx::query_as::<_, ShortUrlRow>(&format!(
            "UPDATE short_urls SET deleted_at = NULL, updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NOT NULL RETURNING {COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(ShortUrl::try_from).transpose()
    }
}

impl PgUrlRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<ShortUrl>, AppError> {
        let row = sqlx::query_as::<_, ShortUrlRow>(&format!(
            "SELECT {COLUMNS} FROM short_urls WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(ShortUrl::try_from).transpose()
    }
}

fn not_found(id: i64) -> AppError {
    AppError::not_found("Short link not found", json!({ "id": id }))
}
