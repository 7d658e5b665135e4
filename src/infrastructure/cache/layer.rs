//! Read-through/write-through cache policy over a generic KV backend.

use std::sync::Arc;

use tracing::{debug, warn};

use super::backend::CacheBackend;
use crate::domain::entities::ShortUrl;
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;

/// Default cache key prefix.
pub const DEFAULT_CACHE_PREFIX: &str = "shorturl";

/// Default cache TTL: one week.
pub const DEFAULT_CACHE_TTL_SECONDS: u64 = 604_800;

/// Static cache policy configuration, wired in at startup.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub enabled: bool,
    pub prefix: String,
    pub ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            prefix: DEFAULT_CACHE_PREFIX.to_string(),
            ttl_seconds: DEFAULT_CACHE_TTL_SECONDS,
        }
    }
}

/// Write-through cache over two keyspaces derived from one record:
/// `{prefix}:code:{code}` holds the JSON-encoded record and
/// `{prefix}:hash:{hash}` holds the code.
///
/// Reads fall through to the repository on a miss and populate the cache
/// on a store hit. TTL is advisory staleness control; the store remains
/// authoritative, and mutations keep the cache coherent synchronously
/// (see [`crate::application::services::ShortUrlService`]).
///
/// When disabled, no backend reads or writes are attempted and every
/// lookup goes straight to the store. The same code path doubles as the
/// degradation path when the backend is down, since backends fail open.
pub struct UrlCache<C: CacheBackend, R: UrlRepository> {
    backend: C,
    repo: Arc<R>,
    config: CacheConfig,
}

impl<C: CacheBackend, R: UrlRepository> UrlCache<C, R> {
    pub fn new(backend: C, repo: Arc<R>, config: CacheConfig) -> Self {
        Self {
            backend,
            repo,
            config,
        }
    }

    /// Reflects the static configuration, not backend health.
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Looks up a record by code, filling the cache on a store hit.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on store errors. Backend trouble is
    /// treated as a miss, never an error.
    pub async fn get_by_code(&self, code: &str) -> Result<Option<ShortUrl>, AppError> {
        if self.config.enabled {
            let key = self.code_key(code);

            if let Ok(Some(raw)) = self.backend.get(&key).await {
                match serde_json::from_str::<ShortUrl>(&raw) {
                    Ok(record) => {
                        debug!("Cache HIT: code {}", code);
                        return Ok(Some(record));
                    }
                    Err(e) => {
                        // Undecodable entries (e.g. after a schema change) are dropped.
                        warn!("Evicting undecodable cache entry {}: {}", key, e);
                        let _ = self.backend.del(&key).await;
                    }
                }
            }
            debug!("Cache MISS: code {}", code);
        }

        let record = self.repo.find_by_code(code).await?;

        if let Some(ref found) = record {
            self.put(found).await;
        }

        Ok(record)
    }

    /// Looks up a code by URL hash, filling the hash keyspace on a store
    /// hit. Independent of [`UrlCache::get_by_code`].
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on store errors.
    pub async fn get_code_by_hash(&self, hash: &str) -> Result<Option<String>, AppError> {
        if self.config.enabled {
            if let Ok(Some(code)) = self.backend.get(&self.hash_key(hash)).await {
                debug!("Cache HIT: hash {}", hash);
                return Ok(Some(code));
            }
            debug!("Cache MISS: hash {}", hash);
        }

        let record = match self.repo.find_by_hash(hash).await? {
            Some(record) => record,
            None => return Ok(None),
        };

        if self.config.enabled {
            let _ = self
                .backend
                .set(&self.hash_key(hash), &record.code, self.config.ttl_seconds)
                .await;
        }

        Ok(Some(record.code))
    }

    /// Unconditionally writes both keys for a record. No-op when disabled.
    pub async fn put(&self, record: &ShortUrl) {
        if !self.config.enabled {
            return;
        }

        let raw = match serde_json::to_string(record) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Failed to encode record {} for caching: {}", record.code, e);
                return;
            }
        };

        let ttl = self.config.ttl_seconds;
        let _ = self.backend.set(&self.code_key(&record.code), &raw, ttl).await;
        let _ = self
            .backend
            .set(&self.hash_key(&record.original_url_hash), &record.code, ttl)
            .await;
    }

    /// Removes both keys for a record. No-op when disabled.
    pub async fn forget(&self, record: &ShortUrl) {
        if !self.config.enabled {
            return;
        }

        let _ = self.backend.del(&self.code_key(&record.code)).await;
        let _ = self
            .backend
            .del(&self.hash_key(&record.original_url_hash))
            .await;
    }

    /// Removes the code-keyed entry only. No-op when disabled.
    pub async fn forget_by_code(&self, code: &str) {
        if !self.config.enabled {
            return;
        }

        let _ = self.backend.del(&self.code_key(code)).await;
    }

    /// Removes the hash-keyed entry only. No-op when disabled.
    pub async fn forget_by_hash(&self, hash: &str) {
        if !self.config.enabled {
            return;
        }

        let _ = self.backend.del(&self.hash_key(hash)).await;
    }

    pub async fn health_check(&self) -> bool {
        self.backend.health_check().await
    }

    fn code_key(&self, code: &str) -> String {
        format!("{}:code:{}", self.config.prefix, code)
    }

    fn hash_key(&self, hash: &str) -> String {
        format!("{}:hash:{}", self.config.prefix, hash)
    }
}
