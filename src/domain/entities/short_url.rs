//! ShortUrl entity representing a short-code to target-URL mapping.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a short URL.
///
/// Only [`UrlStatus::Active`] grants accessibility; `Expired` is a manual
/// administrative state distinct from the `expires_at` timestamp check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrlStatus {
    Active,
    Inactive,
    Expired,
}

impl UrlStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Expired => "expired",
        }
    }

    /// Returns true if this status grants accessibility on its own.
    pub fn is_accessible(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl fmt::Display for UrlStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown status string from storage.
#[derive(Debug, thiserror::Error)]
#[error("unknown url status '{0}'")]
pub struct UnknownUrlStatus(pub String);

impl FromStr for UrlStatus {
    type Err = UnknownUrlStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "expired" => Ok(Self::Expired),
            other => Err(UnknownUrlStatus(other.to_string())),
        }
    }
}

/// A persisted short URL record.
///
/// `original_url_hash` is always the SHA-256 hex digest of `original_url`;
/// the pair changes together (see [`ShortUrl::hash_url`]). `clicks` is
/// mutated only by the resolve path's store-side increment.
///
/// Serde derives exist so the record can be cached as a JSON string in a
/// generic key-value backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortUrl {
    pub id: i64,
    pub code: String,
    pub title: Option<String>,
    pub original_url: String,
    pub original_url_hash: String,
    pub status: UrlStatus,
    pub clicks: i64,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl ShortUrl {
    /// Computes the SHA-256 hex digest of a URL, the dedup key for records.
    ///
    /// Deterministic and stable: 64 lowercase hex characters.
    pub fn hash_url(url: &str) -> String {
        hex::encode(Sha256::digest(url.as_bytes()))
    }

    /// Returns true if the record may be redirected to: `Active` status and
    /// no expiry timestamp in the past.
    pub fn is_accessible(&self) -> bool {
        self.status.is_accessible() && self.expires_at.is_none_or(|e| e > Utc::now())
    }

    /// Returns true if the record has passed its expiry timestamp.
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|e| Utc::now() >= e)
    }

    /// Returns true if the record has been soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Input data for inserting a new record. Clicks start at zero.
#[derive(Debug, Clone)]
pub struct NewShortUrl {
    pub code: String,
    pub title: Option<String>,
    pub original_url: String,
    pub original_url_hash: String,
    pub status: UrlStatus,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Partial update for an existing record.
///
/// `None` fields are left unchanged. Nested options distinguish clearing
/// from omitting: `expires_at: Some(None)` clears the expiry,
/// `Some(Some(t))` sets it, `None` leaves it alone (same for `title`).
///
/// `original_url` and `original_url_hash` must be set together; the
/// service recomputes the hash whenever it patches the URL.
#[derive(Debug, Clone, Default)]
pub struct ShortUrlPatch {
    pub code: Option<String>,
    pub title: Option<Option<String>>,
    pub original_url: Option<String>,
    pub original_url_hash: Option<String>,
    pub status: Option<UrlStatus>,
    pub expires_at: Option<Option<DateTime<Utc>>>,
}

impl ShortUrlPatch {
    /// Returns true if no field is set, i.e. applying the patch is a no-op.
    pub fn is_empty(&self) -> bool {
        self.code.is_none()
            && self.title.is_none()
            && self.original_url.is_none()
            && self.original_url_hash.is_none()
            && self.status.is_none()
            && self.expires_at.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record(status: UrlStatus, expires_at: Option<DateTime<Utc>>) -> ShortUrl {
        let url = "https://example.com".to_string();
        ShortUrl {
            id: 1,
            code: "abc123".to_string(),
            title: None,
            original_url_hash: ShortUrl::hash_url(&url),
            original_url: url,
            status,
            clicks: 0,
            expires_at,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        }
    }

    #[test]
    fn test_hash_url_is_sha256_hex() {
        let hash = ShortUrl::hash_url("https://example.com");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_hash_url_deterministic() {
        assert_eq!(
            ShortUrl::hash_url("https://example.com/path?q=1"),
            ShortUrl::hash_url("https://example.com/path?q=1")
        );
    }

    #[test]
    fn test_hash_url_differs_per_input() {
        assert_ne!(
            ShortUrl::hash_url("https://example.com"),
            ShortUrl::hash_url("https://example.com/")
        );
    }

    #[test]
    fn test_active_without_expiry_is_accessible() {
        assert!(record(UrlStatus::Active, None).is_accessible());
    }

    #[test]
    fn test_inactive_is_not_accessible() {
        assert!(!record(UrlStatus::Inactive, None).is_accessible());
    }

    #[test]
    fn test_expired_status_is_not_accessible() {
        assert!(!record(UrlStatus::Expired, None).is_accessible());
    }

    #[test]
    fn test_active_with_past_expiry_is_not_accessible() {
        let rec = record(UrlStatus::Active, Some(Utc::now() - Duration::seconds(1)));
        assert!(!rec.is_accessible());
        assert!(rec.is_expired());
    }

    #[test]
    fn test_active_with_future_expiry_is_accessible() {
        let rec = record(UrlStatus::Active, Some(Utc::now() + Duration::hours(1)));
        assert!(rec.is_accessible());
        assert!(!rec.is_expired());
    }

    #[test]
    fn test_is_deleted() {
        let mut rec = record(UrlStatus::Active, None);
        assert!(!rec.is_deleted());
        rec.deleted_at = Some(Utc::now());
        assert!(rec.is_deleted());
    }

    #[test]
    fn test_status_string_round_trip() {
        for status in [UrlStatus::Active, UrlStatus::Inactive, UrlStatus::Expired] {
            assert_eq!(status.as_str().parse::<UrlStatus>().unwrap(), status);
        }
        assert!("bogus".parse::<UrlStatus>().is_err());
    }

    #[test]
    fn test_record_json_round_trip() {
        let rec = record(UrlStatus::Active, Some(Utc::now() + Duration::days(1)));
        let raw = serde_json::to_string(&rec).unwrap();
        let back: ShortUrl = serde_json::from_str(&raw).unwrap();
        assert_eq!(back.code, rec.code);
        assert_eq!(back.original_url, rec.original_url);
        assert_eq!(back.status, rec.status);
        assert_eq!(back.expires_at, rec.expires_at);
    }

    #[test]
    fn test_empty_patch() {
        assert!(ShortUrlPatch::default().is_empty());

        let patch = ShortUrlPatch {
            expires_at: Some(None),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }
}
