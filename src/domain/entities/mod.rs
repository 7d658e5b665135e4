//! Core domain entities representing the business data model.
//!
//! Entities are plain data structures without I/O. Separate structs exist
//! for creation ([`NewShortUrl`]) and partial updates ([`ShortUrlPatch`]),
//! following the pattern of keeping store-assigned fields off the inputs.

pub mod short_url;

pub use short_url::{NewShortUrl, ShortUrl, ShortUrlPatch, UnknownUrlStatus, UrlStatus};
