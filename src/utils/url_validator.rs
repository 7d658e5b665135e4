//! URL validation and sanitization.
//!
//! Normalization runs before hashing and deduplication so that cosmetic
//! variants of the same URL (scheme/host case, a bare root slash) map to
//! one record.

use url::Url;

/// Maximum accepted length for a target URL.
pub const MAX_URL_LENGTH: usize = 2048;

/// Errors that can occur while validating a submitted URL.
#[derive(Debug, thiserror::Error)]
pub enum UrlValidationError {
    #[error("The URL cannot be empty")]
    Empty,

    #[error("The URL '{0}' must have an http or https scheme")]
    MissingScheme(String),

    #[error("The URL '{0}' has an unsupported scheme; only http and https are allowed")]
    InvalidScheme(String),

    #[error("The URL '{0}' is not valid")]
    Malformed(String),

    #[error("The URL exceeds the maximum length of {MAX_URL_LENGTH} characters")]
    TooLong,
}

/// Returns true iff the string parses as a URL with a host and an
/// `http`/`https` scheme (scheme case is irrelevant, the parser lowercases
/// it).
pub fn is_valid(url: &str) -> bool {
    match Url::parse(url.trim()) {
        Ok(parsed) => parsed.host_str().is_some() && is_allowed_scheme(parsed.scheme()),
        Err(_) => false,
    }
}

/// Canonicalizes a URL string.
///
/// Trims surrounding whitespace, lowercases scheme and host, preserves
/// path/query/fragment case, and drops a path that is exactly `/` (so
/// `https://a.com/` becomes `https://a.com`); a non-root trailing slash is
/// kept. Input that does not parse with a scheme and host is returned
/// trimmed but otherwise unchanged.
pub fn sanitize(url: &str) -> String {
    let trimmed = url.trim();

    match Url::parse(trimmed) {
        Ok(parsed) if parsed.host_str().is_some() => rebuild(&parsed),
        _ => trimmed.to_string(),
    }
}

/// Validates a URL and returns its sanitized form.
///
/// # Errors
///
/// - [`UrlValidationError::Empty`] - blank after trimming
/// - [`UrlValidationError::TooLong`] - longer than [`MAX_URL_LENGTH`]
/// - [`UrlValidationError::MissingScheme`] - looks like a bare host
///   (`example.com`) with no scheme
/// - [`UrlValidationError::InvalidScheme`] - a scheme other than
///   http/https (`ftp:`, `javascript:`, ...)
/// - [`UrlValidationError::Malformed`] - unparseable or missing host
pub fn validate_and_sanitize(url: &str) -> Result<String, UrlValidationError> {
    let trimmed = url.trim();

    if trimmed.is_empty() {
        return Err(UrlValidationError::Empty);
    }

    if trimmed.len() > MAX_URL_LENGTH {
        return Err(UrlValidationError::TooLong);
    }

    match Url::parse(trimmed) {
        Ok(parsed) => {
            // "example.com:8080/path" parses with the host in scheme
            // position. A dotted "scheme" without a host is a bare host
            // missing its scheme, not an exotic protocol.
            if parsed.host_str().is_none() && parsed.scheme().contains('.') {
                return Err(UrlValidationError::MissingScheme(trimmed.to_string()));
            }
            if !is_allowed_scheme(parsed.scheme()) {
                return Err(UrlValidationError::InvalidScheme(trimmed.to_string()));
            }
            if parsed.host_str().is_none() {
                return Err(UrlValidationError::Malformed(trimmed.to_string()));
            }
            Ok(rebuild(&parsed))
        }
        // "example.com" parses as a relative URL; treat anything that looks
        // like a bare host as a missing scheme rather than garbage.
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            if looks_like_bare_host(trimmed) {
                Err(UrlValidationError::MissingScheme(trimmed.to_string()))
            } else {
                Err(UrlValidationError::Malformed(trimmed.to_string()))
            }
        }
        Err(_) => Err(UrlValidationError::Malformed(trimmed.to_string())),
    }
}

fn is_allowed_scheme(scheme: &str) -> bool {
    matches!(scheme, "http" | "https")
}

fn looks_like_bare_host(input: &str) -> bool {
    input
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphanumeric())
        && !input.contains(' ')
}

/// Reconstructs `scheme://host[:port][path][?query][#fragment]`.
///
/// The parser already lowercased scheme and host; an explicit default port
/// (`:80`/`:443`) has been stripped by it as well.
fn rebuild(parsed: &Url) -> String {
    let mut out = format!(
        "{}://{}",
        parsed.scheme(),
        parsed.host_str().unwrap_or_default()
    );

    if let Some(port) = parsed.port() {
        out.push(':');
        out.push_str(&port.to_string());
    }

    let path = parsed.path();
    if path != "/" {
        out.push_str(path);
    }

    if let Some(query) = parsed.query() {
        out.push('?');
        out.push_str(query);
    }

    if let Some(fragment) = parsed.fragment() {
        out.push('#');
        out.push_str(fragment);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_http_and_https() {
        assert!(is_valid("http://example.com"));
        assert!(is_valid("https://example.com/path?q=1"));
        assert!(is_valid("HTTPS://EXAMPLE.COM"));
    }

    #[test]
    fn test_is_valid_rejects_other_schemes() {
        assert!(!is_valid("ftp://example.com"));
        assert!(!is_valid("javascript:alert(1)"));
        assert!(!is_valid("mailto:test@example.com"));
    }

    #[test]
    fn test_is_valid_rejects_garbage() {
        assert!(!is_valid(""));
        assert!(!is_valid("example.com"));
        assert!(!is_valid("not a url"));
    }

    #[test]
    fn test_sanitize_trims_and_lowercases() {
        assert_eq!(
            sanitize("  HTTPS://Example.com/  "),
            "https://example.com"
        );
    }

    #[test]
    fn test_sanitize_drops_root_slash_only() {
        assert_eq!(sanitize("https://a.com/"), "https://a.com");
        assert_eq!(sanitize("https://a.com"), "https://a.com");
        assert_eq!(sanitize("https://a.com/path/"), "https://a.com/path/");
    }

    #[test]
    fn test_sanitize_preserves_path_case() {
        assert_eq!(
            sanitize("https://Example.com/CaseSensitive/Path"),
            "https://example.com/CaseSensitive/Path"
        );
    }

    #[test]
    fn test_sanitize_preserves_query_and_fragment() {
        assert_eq!(
            sanitize("https://a.com/page?Key=Value#Section"),
            "https://a.com/page?Key=Value#Section"
        );
    }

    #[test]
    fn test_sanitize_keeps_custom_port() {
        assert_eq!(
            sanitize("http://a.com:8080/api"),
            "http://a.com:8080/api"
        );
    }

    #[test]
    fn test_sanitize_unparseable_returns_trimmed_input() {
        assert_eq!(sanitize("  example.com  "), "example.com");
        assert_eq!(sanitize("not a url"), "not a url");
    }

    #[test]
    fn test_sanitize_idempotent() {
        for input in [
            "  HTTPS://Example.com/  ",
            "https://a.com/path/?q=1#frag",
            "http://a.com:8080",
            "https://sub.example.com/A/B?x=Y",
        ] {
            let once = sanitize(input);
            assert_eq!(sanitize(&once), once, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn test_validate_success_returns_sanitized() {
        let result = validate_and_sanitize("  HTTPS://Example.com/  ").unwrap();
        assert_eq!(result, "https://example.com");
    }

    #[test]
    fn test_validate_empty() {
        assert!(matches!(
            validate_and_sanitize("   "),
            Err(UrlValidationError::Empty)
        ));
    }

    #[test]
    fn test_validate_bare_host_is_missing_scheme() {
        assert!(matches!(
            validate_and_sanitize("example.com/path"),
            Err(UrlValidationError::MissingScheme(_))
        ));
    }

    #[test]
    fn test_validate_bare_host_with_port_is_missing_scheme() {
        for input in ["example.com:8080/path", "sub.example.com:443"] {
            assert!(
                matches!(
                    validate_and_sanitize(input),
                    Err(UrlValidationError::MissingScheme(_))
                ),
                "expected MissingScheme for {input:?}"
            );
        }
    }

    #[test]
    fn test_validate_garbage_is_malformed() {
        assert!(matches!(
            validate_and_sanitize("not a valid url"),
            Err(UrlValidationError::Malformed(_))
        ));
    }

    #[test]
    fn test_validate_missing_host_is_malformed() {
        assert!(matches!(
            validate_and_sanitize("http://"),
            Err(UrlValidationError::Malformed(_))
        ));
    }

    #[test]
    fn test_validate_rejects_non_http_schemes() {
        for input in [
            "ftp://files.example.com/x",
            "javascript:alert('xss')",
            "data:text/plain,Hello",
            "mailto:test@example.com",
            "file:///etc/passwd",
        ] {
            assert!(
                matches!(
                    validate_and_sanitize(input),
                    Err(UrlValidationError::InvalidScheme(_))
                ),
                "expected InvalidScheme for {input:?}"
            );
        }
    }

    #[test]
    fn test_validate_too_long() {
        let url = format!("https://example.com/{}", "a".repeat(MAX_URL_LENGTH));
        assert!(matches!(
            validate_and_sanitize(&url),
            Err(UrlValidationError::TooLong)
        ));
    }

    #[test]
    fn test_validate_accepts_length_at_bound() {
        let url = format!("https://example.com/{}", "a".repeat(2020));
        assert!(url.len() <= MAX_URL_LENGTH);
        assert!(validate_and_sanitize(&url).is_ok());
    }
}
