//! Short URL creation, resolution, and mutation service.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::{debug, warn};

use crate::domain::entities::{NewShortUrl, ShortUrl, ShortUrlPatch, UrlStatus};
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;
use crate::infrastructure::cache::{CacheBackend, UrlCache};
use crate::utils::code_generator::CodeGenerator;
use crate::utils::url_validator::validate_and_sanitize;

/// Default number of code generation attempts before the doubled-length
/// fallback kicks in.
pub const DEFAULT_MAX_GENERATION_ATTEMPTS: usize = 10;

/// Input for creating a short URL.
#[derive(Debug, Clone)]
pub struct CreateShortUrl {
    pub original_url: String,
    pub title: Option<String>,
    /// Defaults to [`UrlStatus::Active`] when omitted.
    pub status: Option<UrlStatus>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl CreateShortUrl {
    pub fn from_url(original_url: impl Into<String>) -> Self {
        Self {
            original_url: original_url.into(),
            title: None,
            status: None,
            expires_at: None,
        }
    }
}

/// Input for updating a short URL. `None` fields are left untouched.
///
/// Nested options distinguish clearing from omitting: `expires_at:
/// Some(None)` clears the expiry while `None` does not touch it (same for
/// `title`). `code` renames the short code, subject to uniqueness.
#[derive(Debug, Clone, Default)]
pub struct UpdateShortUrl {
    pub original_url: Option<String>,
    pub code: Option<String>,
    pub title: Option<Option<String>>,
    pub status: Option<UrlStatus>,
    pub expires_at: Option<Option<DateTime<Utc>>>,
}

impl UpdateShortUrl {
    pub fn has_changes(&self) -> bool {
        self.original_url.is_some()
            || self.code.is_some()
            || self.title.is_some()
            || self.status.is_some()
            || self.expires_at.is_some()
    }
}

/// Service orchestrating validation, deduplication, code generation, and
/// cache synchronization for short URLs.
///
/// Cache coherence is maintained synchronously inside each mutating
/// method (create populates, update evicts stale keys before
/// repopulating, delete evicts, restore repopulates). There is no event
/// bus; the invalidation order is part of these methods' contracts.
pub struct ShortUrlService<R: UrlRepository, C: CacheBackend> {
    repo: Arc<R>,
    cache: Arc<UrlCache<C, R>>,
    generator: CodeGenerator,
    max_attempts: usize,
}

impl<R: UrlRepository, C: CacheBackend> ShortUrlService<R, C> {
    pub fn new(repo: Arc<R>, cache: Arc<UrlCache<C, R>>, generator: CodeGenerator) -> Self {
        Self::with_max_attempts(repo, cache, generator, DEFAULT_MAX_GENERATION_ATTEMPTS)
    }

    pub fn with_max_attempts(
        repo: Arc<R>,
        cache: Arc<UrlCache<C, R>>,
        generator: CodeGenerator,
        max_attempts: usize,
    ) -> Self {
        Self {
            repo,
            cache,
            generator,
            max_attempts,
        }
    }

    /// Creates a short URL.
    ///
    /// # Deduplication
    ///
    /// The sanitized URL is hashed; if a live record with the same hash
    /// exists, it is returned unchanged (idempotent create, no insert).
    /// Two concurrent creates for the same URL are arbitrated by the
    /// store's unique hash constraint: the loser re-fetches and returns
    /// the winner's record. A conflict on the code alone is retried once
    /// with a freshly generated code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the URL does not validate,
    /// [`AppError::Internal`] on store errors or generator failure.
    pub async fn create(&self, input: CreateShortUrl) -> Result<ShortUrl, AppError> {
        let url = validate_and_sanitize(&input.original_url).map_err(|e| {
            AppError::bad_request(
                e.to_string(),
                json!({ "url": input.original_url, "reason": e.to_string() }),
            )
        })?;

        let hash = ShortUrl::hash_url(&url);

        if let Some(existing) = self.repo.find_by_hash(&hash).await? {
            debug!("Create deduplicated to existing code {}", existing.code);
            return Ok(existing);
        }

        let code = self.generate_unique_code().await?;

        let new_url = NewShortUrl {
            code,
            title: input.title,
            original_url: url,
            original_url_hash: hash.clone(),
            status: input.status.unwrap_or(UrlStatus::Active),
            expires_at: input.expires_at,
        };

        let record = match self.repo.insert(new_url.clone()).await {
            Ok(record) => record,
            Err(AppError::Conflict { .. }) => {
                // The store's uniqueness constraint fired. Either a
                // concurrent create of the same URL won the race, or the
                // code itself collided between the pre-check and the
                // insert.
                match self.repo.find_by_hash(&hash).await? {
                    Some(winner) => {
                        debug!("Create lost the race, returning code {}", winner.code);
                        winner
                    }
                    None => {
                        warn!(
                            "Code {} collided at insert, retrying with a fresh code",
                            new_url.code
                        );
                        let mut retry = new_url;
                        retry.code = self.generate_unique_code().await?;
                        self.repo.insert(retry).await?
                    }
                }
            }
            Err(e) => return Err(e),
        };

        self.cache.put(&record).await;

        Ok(record)
    }

    /// Resolves a code to its record and counts the click.
    ///
    /// Lookup goes through the cache layer (read-through to the store).
    /// An unknown code and an inaccessible record (inactive, expired
    /// status, or past expiry) are deliberately indistinguishable, so
    /// disabled links cannot be enumerated.
    ///
    /// A failed click increment is logged and does not fail a resolution
    /// that already succeeded; the increment is at-least-once against the
    /// store.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code is unknown or the
    /// record is not accessible.
    pub async fn resolve(&self, code: &str) -> Result<ShortUrl, AppError> {
        let mut record = self
            .cache
            .get_by_code(code)
            .await?
            .filter(|r| r.is_accessible())
            .ok_or_else(|| {
                AppError::not_found("Short link not found", json!({ "code": code }))
            })?;

        match self.repo.increment_clicks(record.id).await {
            Ok(clicks) => record.clicks = clicks,
            Err(e) => {
                warn!("Click increment failed for {}: {}", code, e);
            }
        }

        Ok(record)
    }

    /// Applies a partial update to the record behind `code`.
    ///
    /// Only the provided fields are touched. A new URL goes through the
    /// same sanitize-and-validate path as create and the content hash is
    /// recomputed. A code rename is checked for collisions. When nothing
    /// is provided the record is returned as-is without a store write.
    ///
    /// Cache keys that became stale (old code, old hash) are evicted
    /// before the updated record is re-cached.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code is unknown or
    /// soft-deleted, [`AppError::Validation`] on an invalid URL,
    /// [`AppError::Conflict`] on a code rename collision.
    pub async fn update(&self, code: &str, input: UpdateShortUrl) -> Result<ShortUrl, AppError> {
        let existing = self.repo.find_by_code(code).await?.ok_or_else(|| {
            AppError::not_found("Short link not found", json!({ "code": code }))
        })?;

        if !input.has_changes() {
            return Ok(existing);
        }

        let mut patch = ShortUrlPatch {
            title: input.title,
            status: input.status,
            expires_at: input.expires_at,
            ..Default::default()
        };

        if let Some(raw_url) = input.original_url {
            let url = validate_and_sanitize(&raw_url).map_err(|e| {
                AppError::bad_request(
                    e.to_string(),
                    json!({ "url": raw_url, "reason": e.to_string() }),
                )
            })?;
            patch.original_url_hash = Some(ShortUrl::hash_url(&url));
            patch.original_url = Some(url);
        }

        if let Some(new_code) = input.code {
            if new_code != existing.code && self.repo.exists_by_code(&new_code).await? {
                return Err(AppError::conflict(
                    "Code already exists",
                    json!({ "code": new_code }),
                ));
            }
            patch.code = Some(new_code);
        }

        let updated = self.repo.update(existing.id, patch).await?;

        // Evict stale keys before repopulating with final values.
        if updated.code != existing.code {
            self.cache.forget_by_code(&existing.code).await;
        }
        if updated.original_url_hash != existing.original_url_hash {
            self.cache.forget_by_hash(&existing.original_url_hash).await;
        }
        self.cache.put(&updated).await;

        Ok(updated)
    }

    /// Soft-deletes the record behind `code` and evicts its cache keys.
    ///
    /// The record remains in storage for audit and restore; its code and
    /// hash become reusable by new records.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code is unknown or already
    /// soft-deleted.
    pub async fn delete(&self, code: &str) -> Result<(), AppError> {
        let record = self.repo.find_by_code(code).await?.ok_or_else(|| {
            AppError::not_found("Short link not found", json!({ "code": code }))
        })?;

        self.repo.soft_delete(record.id).await?;
        self.cache.forget(&record).await;

        Ok(())
    }

    /// Permanently removes the record behind `code`, soft-deleted or not.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no such record exists at all.
    pub async fn purge(&self, code: &str) -> Result<(), AppError> {
        let record = self
            .repo
            .find_by_code_with_deleted(code)
            .await?
            .ok_or_else(|| {
                AppError::not_found("Short link not found", json!({ "code": code }))
            })?;

        self.repo.delete(record.id).await?;
        self.cache.forget(&record).await;

        Ok(())
    }

    /// Restores a soft-deleted record and repopulates its cache keys.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code does not reference a
    /// soft-deleted record, [`AppError::Conflict`] if its code or hash
    /// has been reused in the meantime.
    pub async fn restore(&self, code: &str) -> Result<ShortUrl, AppError> {
        let record = self
            .repo
            .find_by_code_with_deleted(code)
            .await?
            .filter(|r| r.is_deleted())
            .ok_or_else(|| {
                AppError::not_found("Short link not found", json!({ "code": code }))
            })?;

        let restored = self.repo.restore(record.id).await?.ok_or_else(|| {
            AppError::not_found("Short link not found", json!({ "code": code }))
        })?;

        self.cache.put(&restored).await;

        Ok(restored)
    }

    /// Generates a code no live record uses, retrying up to the attempt
    /// limit.
    ///
    /// Exhaustion falls back to concatenating two fresh codes: doubling
    /// the length does not guarantee uniqueness, but it shrinks the
    /// collision probability enough that the store constraint can catch
    /// the rest.
    async fn generate_unique_code(&self) -> Result<String, AppError> {
        for _ in 0..self.max_attempts {
            let code = self.generator.generate();

            if code.is_empty() {
                return Err(AppError::internal(
                    "Code generator produced an empty code",
                    json!({ "length": self.generator.length() }),
                ));
            }

            if !self.repo.exists_by_code(&code).await? {
                return Ok(code);
            }
        }

        warn!(
            "Exhausted {} code generation attempts, doubling code length",
            self.max_attempts
        );

        let code = format!("{}{}", self.generator.generate(), self.generator.generate());
        if code.is_empty() {
            return Err(AppError::internal(
                "Code generator produced an empty code",
                json!({ "length": self.generator.length() }),
            ));
        }

        Ok(code)
    }
}
