//! # shorturl-core
//!
//! The short-code resolution and caching core of a URL shortener: it
//! generates collision-free codes, normalizes and validates submitted
//! URLs, resolves codes to targets through a read-through cache, and
//! keeps that cache coherent under create/update/delete.
//!
//! ## Architecture
//!
//! The crate follows Clean Architecture principles with clear layer
//! separation:
//!
//! - **Domain Layer** ([`domain`]) - Entities and repository traits
//! - **Application Layer** ([`application`]) - The create/resolve/update
//!   orchestration
//! - **Infrastructure Layer** ([`infrastructure`]) - PostgreSQL store and
//!   cache backends
//! - **Utilities** ([`utils`]) - Code generation, URL validation
//!
//! HTTP routing, admin UIs, and authentication are external collaborators:
//! they call [`application::services::ShortUrlService`] and translate
//! [`AppError`] into their transport (301 on resolve, 404 on `NotFound`,
//! 201/200 for fresh/deduplicated creates).
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use shorturl_core::prelude::*;
//! use shorturl_core::infrastructure::cache::{RedisBackend, UrlCache};
//! use shorturl_core::infrastructure::persistence::PgUrlRepository;
//!
//! # async fn wire() -> anyhow::Result<()> {
//! let config = shorturl_core::config::load_from_env()?;
//!
//! let pool = sqlx::PgPool::connect(&config.database_url).await?;
//! let repo = Arc::new(PgUrlRepository::new(Arc::new(pool)));
//!
//! let backend = RedisBackend::connect(config.redis_url.as_deref().unwrap()).await?;
//! let cache = Arc::new(UrlCache::new(backend, repo.clone(), config.cache_config()));
//!
//! let service = ShortUrlService::new(repo, cache, config.code_generator());
//! let record = service.create(CreateShortUrl::from_url("https://example.com")).await?;
//! let resolved = service.resolve(&record.code).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration
//!
//! Loaded from environment variables via [`config::Config`]; see the
//! [`config`] module for the available options.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod utils;

pub use error::AppError;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{CreateShortUrl, ShortUrlService, UpdateShortUrl};
    pub use crate::config::Config;
    pub use crate::domain::entities::{NewShortUrl, ShortUrl, ShortUrlPatch, UrlStatus};
    pub use crate::domain::repositories::UrlRepository;
    pub use crate::error::AppError;
    pub use crate::infrastructure::cache::{CacheBackend, CacheConfig, UrlCache};
    pub use crate::utils::code_generator::CodeGenerator;
    pub use crate::utils::url_validator::{UrlValidationError, validate_and_sanitize};
}
