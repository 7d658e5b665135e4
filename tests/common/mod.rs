#![allow(dead_code)]

//! Shared test harness: an in-memory repository honoring the same
//! live-row uniqueness rules as the PostgreSQL schema, plus service
//! constructors over the in-memory cache backend.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use shorturl_core::infrastructure::cache::{CacheConfig, MemoryBackend, UrlCache};
use shorturl_core::prelude::*;

/// In-memory [`UrlRepository`] with the same semantics as the Postgres
/// schema: lookups scope to live rows, uniqueness of code and hash holds
/// among live rows only, clicks increment atomically.
#[derive(Default)]
pub struct InMemoryUrlRepository {
    rows: Mutex<Vec<ShortUrl>>,
    next_id: AtomicI64,
}

impl InMemoryUrlRepository {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Number of live (non-soft-deleted) rows.
    pub fn live_count(&self) -> usize {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| !r.is_deleted())
            .count()
    }

    pub fn live_count_for_hash(&self, hash: &str) -> usize {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| !r.is_deleted() && r.original_url_hash == hash)
            .count()
    }

    fn conflict(what: &str) -> AppError {
        AppError::conflict("Unique constraint violation", json!({ "constraint": what }))
    }
}

#[async_trait]
impl UrlRepository for InMemoryUrlRepository {
    async fn find_by_code(&self, code: &str) -> Result<Option<ShortUrl>, AppError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|r| !r.is_deleted() && r.code == code)
            .cloned())
    }

    async fn find_by_hash(&self, hash: &str) -> Result<Option<ShortUrl>, AppError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|r| !r.is_deleted() && r.original_url_hash == hash)
            .cloned())
    }

    async fn find_by_code_with_deleted(&self, code: &str) -> Result<Option<ShortUrl>, AppError> {
        let rows = self.rows.lock().unwrap();
        // Prefer a live row when a soft-deleted one shares the code.
        Ok(rows
            .iter()
            .find(|r| !r.is_deleted() && r.code == code)
            .or_else(|| rows.iter().find(|r| r.code == code))
            .cloned())
    }

    async fn exists_by_code(&self, code: &str) -> Result<bool, AppError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .any(|r| !r.is_deleted() && r.code == code))
    }

    async fn insert(&self, new_url: NewShortUrl) -> Result<ShortUrl, AppError> {
        let mut rows = self.rows.lock().unwrap();

        if rows.iter().any(|r| !r.is_deleted() && r.code == new_url.code) {
            return Err(Self::conflict("short_urls_code_live_idx"));
        }
        if rows
            .iter()
            .any(|r| !r.is_deleted() && r.original_url_hash == new_url.original_url_hash)
        {
            return Err(Self::conflict("short_urls_hash_live_idx"));
        }

        let now = Utc::now();
        let record = ShortUrl {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            code: new_url.code,
            title: new_url.title,
            original_url: new_url.original_url,
            original_url_hash: new_url.original_url_hash,
            status: new_url.status,
            clicks: 0,
            expires_at: new_url.expires_at,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        rows.push(record.clone());

        Ok(record)
    }

    async fn update(&self, id: i64, patch: ShortUrlPatch) -> Result<ShortUrl, AppError> {
        let mut rows = self.rows.lock().unwrap();

        if let Some(ref code) = patch.code
            && rows
                .iter()
                .any(|r| !r.is_deleted() && r.id != id && r.code == *code)
        {
            return Err(Self::conflict("short_urls_code_live_idx"));
        }

        let row = rows
            .iter_mut()
            .find(|r| !r.is_deleted() && r.id == id)
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "id": id })))?;

        if let Some(code) = patch.code {
            row.code = code;
        }
        if let Some(title) = patch.title {
            row.title = title;
        }
        if let Some(url) = patch.original_url {
            row.original_url = url;
        }
        if let Some(hash) = patch.original_url_hash {
            row.original_url_hash = hash;
        }
        if let Some(status) = patch.status {
            row.status = status;
        }
        if let Some(expires_at) = patch.expires_at {
            row.expires_at = expires_at;
        }
        row.updated_at = Utc::now();

        Ok(row.clone())
    }

    async fn increment_clicks(&self, id: i64) -> Result<i64, AppError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|r| !r.is_deleted() && r.id == id)
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "id": id })))?;

        row.clicks += 1;
        Ok(row.clicks)
    }

    async fn soft_delete(&self, id: i64) -> Result<bool, AppError> {
        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|r| !r.is_deleted() && r.id == id) {
            Some(row) => {
                row.deleted_at = Some(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| r.id != id);
        Ok(rows.len() < before)
    }

    async fn restore(&self, id: i64) -> Result<Option<ShortUrl>, AppError> {
        let mut rows = self.rows.lock().unwrap();

        let (code, hash) = match rows.iter().find(|r| r.is_deleted() && r.id == id) {
            Some(row) => (row.code.clone(), row.original_url_hash.clone()),
            None => return Ok(None),
        };

        if rows
            .iter()
            .any(|r| !r.is_deleted() && (r.code == code || r.original_url_hash == hash))
        {
            return Err(Self::conflict("short_urls_code_live_idx"));
        }

        let row = rows.iter_mut().find(|r| r.id == id).unwrap();
        row.deleted_at = None;
        row.updated_at = Utc::now();
        Ok(Some(row.clone()))
    }
}

pub type TestService = ShortUrlService<InMemoryUrlRepository, MemoryBackend>;

/// Service over the in-memory store and an enabled in-memory cache.
/// The returned backend handle shares storage with the cache and can be
/// used to probe raw keys.
pub fn service() -> (TestService, Arc<InMemoryUrlRepository>, MemoryBackend) {
    let repo = Arc::new(InMemoryUrlRepository::new());
    let backend = MemoryBackend::new();
    let probe = backend.clone();
    let cache = Arc::new(UrlCache::new(
        backend,
        repo.clone(),
        CacheConfig::default(),
    ));

    (
        ShortUrlService::new(repo.clone(), cache, CodeGenerator::default()),
        repo,
        probe,
    )
}

pub fn code_key(code: &str) -> String {
    format!("shorturl:code:{}", code)
}

pub fn hash_key(hash: &str) -> String {
    format!("shorturl:hash:{}", hash)
}
