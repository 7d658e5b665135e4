//! Caching layer for fast short-code resolution.
//!
//! [`UrlCache`] is the read-through/write-through policy wrapper over a
//! generic [`CacheBackend`]:
//! - [`RedisBackend`] - production Redis-backed storage
//! - [`MemoryBackend`] - in-process map for dev and tests
//! - [`NullBackend`] - no-op implementation for disabled caching

mod backend;
mod layer;
mod memory_backend;
mod null_backend;
mod redis_backend;

pub use backend::{CacheBackend, CacheError, CacheResult};
pub use layer::{CacheConfig, DEFAULT_CACHE_PREFIX, DEFAULT_CACHE_TTL_SECONDS, UrlCache};
pub use memory_backend::MemoryBackend;
pub use null_backend::NullBackend;
pub use redis_backend::RedisBackend;
