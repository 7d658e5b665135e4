//! Cache backend trait and error types.

use async_trait::async_trait;
use std::fmt;

/// Errors that can occur during cache backend operations.
#[derive(Debug)]
pub enum CacheError {
    ConnectionError(String),
    OperationError(String),
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::ConnectionError(e) => write!(f, "Cache connection error: {}", e),
            Self::OperationError(e) => write!(f, "Cache operation error: {}", e),
        }
    }
}

impl std::error::Error for CacheError {}

/// Result type for cache backend operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Generic key-value backend with per-entry TTL.
///
/// The cache is an optimization layer, never a coordination point, so
/// implementations must be fail-open: a broken backend degrades lookups to
/// the store instead of failing requests. Production implementations log
/// their errors and report misses / silent no-ops rather than returning
/// `Err` from `get`/`set`/`del`.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisBackend`] - Redis with TTL support
/// - [`crate::infrastructure::cache::MemoryBackend`] - in-process map for dev and tests
/// - [`crate::infrastructure::cache::NullBackend`] - no-op for disabled caching
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Retrieves a value by key. `Ok(None)` covers both a miss and a
    /// backend error in fail-open implementations.
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Stores a value under `key` expiring after `ttl_seconds`.
    async fn set(&self, key: &str, value: &str, ttl_seconds: u64) -> CacheResult<()>;

    /// Removes a key. Removing an absent key is not an error.
    async fn del(&self, key: &str) -> CacheResult<()>;

    /// Reports whether the backend is reachable.
    async fn health_check(&self) -> bool;
}
