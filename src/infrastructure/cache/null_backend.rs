//! No-op cache backend for disabled caching.

use super::backend::{CacheBackend, CacheResult};
use async_trait::async_trait;
use tracing::debug;

/// A cache backend that does nothing.
///
/// Used when Redis is unavailable or caching is explicitly disabled; every
/// lookup degrades to the store. All operations succeed immediately
/// without storing or retrieving data.
pub struct NullBackend;

impl NullBackend {
    pub fn new() -> Self {
        debug!("Using NullBackend (caching disabled)");
        Self
    }
}

impl Default for NullBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheBackend for NullBackend {
    async fn get(&self, _key: &str) -> CacheResult<Option<String>> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: &str, _ttl_seconds: u64) -> CacheResult<()> {
        Ok(())
    }

    async fn del(&self, _key: &str) -> CacheResult<()> {
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}
