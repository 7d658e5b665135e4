//! Application services orchestrating domain logic.

pub mod short_url_service;

pub use short_url_service::{
    CreateShortUrl, DEFAULT_MAX_GENERATION_ATTEMPTS, ShortUrlService, UpdateShortUrl,
};
