//! Repository trait for short URL data access.

use crate::domain::entities::{NewShortUrl, ShortUrl, ShortUrlPatch};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for short URL records.
///
/// All lookups exclude soft-deleted rows unless the method name says
/// otherwise; code and hash uniqueness likewise hold only among live rows,
/// so a soft-deleted code or hash may be reused by a new record.
///
/// The store's unique constraints on `code` and `original_url_hash` are
/// the actual correctness guarantee for concurrent creates. The service's
/// pre-insert checks only make collisions rare; a lost race surfaces as
/// [`AppError::Conflict`] from [`UrlRepository::insert`].
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUrlRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlRepository: Send + Sync {
    /// Finds a live record by its short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_code(&self, code: &str) -> Result<Option<ShortUrl>, AppError>;

    /// Finds a live record by the SHA-256 hex digest of its normalized URL.
    ///
    /// Used by the create path for deduplication.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_hash(&self, hash: &str) -> Result<Option<ShortUrl>, AppError>;

    /// Finds a record by code including soft-deleted rows.
    ///
    /// Only the restore and purge paths use this.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_code_with_deleted(&self, code: &str) -> Result<Option<ShortUrl>, AppError>;

    /// Returns true if a live record with this code exists.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn exists_by_code(&self, code: &str) -> Result<bool, AppError>;

    /// Inserts a new record with zero clicks.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] when the code or URL hash collides
    /// with a live row, [`AppError::Internal`] on other database errors.
    async fn insert(&self, new_url: NewShortUrl) -> Result<ShortUrl, AppError>;

    /// Partially updates a live record and returns the updated row.
    ///
    /// Only fields present in [`ShortUrlPatch`] are modified.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no live record matches `id`,
    /// [`AppError::Conflict`] on a code rename collision,
    /// [`AppError::Internal`] on other database errors.
    async fn update(&self, id: i64, patch: ShortUrlPatch) -> Result<ShortUrl, AppError>;

    /// Atomically increments the click counter at the store
    /// (`clicks = clicks + 1`, never read-modify-write) and returns the
    /// new count. Concurrent increments must not lose updates.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the record no longer exists,
    /// [`AppError::Internal`] on database errors.
    async fn increment_clicks(&self, id: i64) -> Result<i64, AppError>;

    /// Soft-deletes a record by setting `deleted_at = now()`.
    ///
    /// Returns `Ok(true)` if a live record was deleted, `Ok(false)` if it
    /// was not found or already deleted.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn soft_delete(&self, id: i64) -> Result<bool, AppError>;

    /// Permanently removes a record, soft-deleted or not.
    ///
    /// Returns `Ok(true)` if a row was removed.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;

    /// Clears `deleted_at`, returning the restored record, or `None` if
    /// the id does not reference a soft-deleted row.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if restoring would collide with a
    /// live code or hash, [`AppError::Internal`] on database errors.
    async fn restore(&self, id: i64) -> Result<Option<ShortUrl>, AppError>;
}
