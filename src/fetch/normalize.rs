//! URL normalization and resolution
//!
//! User input is coerced into an absolute URL before any network activity,
//! and resource references found in a page are resolved against the page's
//! final URL.

use crate::error::{Error, Result};
use tracing::debug;
use url::Url;

/// Scheme assumed when the input carries none
const DEFAULT_SCHEME_PREFIX: &str = "https://";

/// Coerce user input into an absolute URL.
///
/// Input without a `://` separator is prefixed with `https://`. The result
/// is validated by URL construction only; no request is made.
///
/// # Errors
///
/// Returns `Error::InvalidUrl` echoing `input` when construction fails.
///
/// # Example
///
/// ```rust
/// use metatags_web::fetch::normalize_url;
///
/// let url = normalize_url("example.com").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/");
/// assert!(normalize_url("").is_err());
/// ```
pub fn normalize_url(input: &str) -> Result<Url> {
    let trimmed = input.trim();
    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("{DEFAULT_SCHEME_PREFIX}{trimmed}")
    };

    Url::parse(&candidate).map_err(|e| {
        debug!(input, candidate = %candidate, error = %e, "Rejected URL input");
        Error::invalid_url(input)
    })
}

/// Whether `value` already parses as an absolute URL
pub fn is_absolute_url(value: &str) -> bool {
    Url::parse(value).is_ok()
}

/// Resolve a possibly relative reference against `base`.
///
/// Surrounding whitespace is dropped first, as the HTML URL parser does.
/// Empty values, `data:` URIs and already-absolute URLs are then returned
/// as-is, so resolution is idempotent. A reference that cannot be joined is
/// kept unchanged.
pub fn resolve_against(value: &str, base: &Url) -> String {
    let value = value.trim();
    if value.is_empty() || is_data_uri(value) || is_absolute_url(value) {
        return value.to_string();
    }

    match base.join(value) {
        Ok(resolved) => resolved.into(),
        Err(e) => {
            debug!(value, base = %base, error = %e, "Keeping unresolved URL");
            value.to_string()
        }
    }
}

/// Whether `value` is an inline `data:` URI (scheme matched case-insensitively)
pub fn is_data_uri(value: &str) -> bool {
    value
        .trim_start()
        .get(..5)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("data:"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.com/blog/post.html").unwrap()
    }

    #[test]
    fn test_prefixes_https_when_scheme_missing() {
        let url = normalize_url("openai.com").unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.host_str(), Some("openai.com"));
    }

    #[test]
    fn test_keeps_explicit_scheme() {
        let url = normalize_url("http://example.com/path?q=1").unwrap();
        assert_eq!(url.as_str(), "http://example.com/path?q=1");
    }

    #[test]
    fn test_trims_surrounding_whitespace() {
        let url = normalize_url("  example.com/a  ").unwrap();
        assert_eq!(url.as_str(), "https://example.com/a");
    }

    #[test]
    fn test_empty_input_is_invalid() {
        match normalize_url("") {
            Err(Error::InvalidUrl { input }) => assert_eq!(input, ""),
            other => panic!("expected InvalidUrl, got {other:?}"),
        }
    }

    #[test]
    fn test_garbage_input_is_invalid() {
        assert!(matches!(
            normalize_url("http://exa mple.com"),
            Err(Error::InvalidUrl { .. })
        ));
        assert!(matches!(
            normalize_url("https://"),
            Err(Error::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_resolve_relative_path() {
        assert_eq!(
            resolve_against("images/a.png", &base()),
            "https://example.com/blog/images/a.png"
        );
        assert_eq!(
            resolve_against("/favicon.ico", &base()),
            "https://example.com/favicon.ico"
        );
    }

    #[test]
    fn test_data_uri_detection() {
        assert!(is_data_uri("data:image/png;base64,AAAA"));
        assert!(is_data_uri("  DATA:image/gif;base64,R0lGOD"));
        assert!(!is_data_uri("/data/image.png"));
        assert!(!is_data_uri("dat"));
    }

    #[test]
    fn test_resolve_trims_padding() {
        assert_eq!(
            resolve_against("  images/a.png ", &base()),
            "https://example.com/blog/images/a.png"
        );
        assert_eq!(
            resolve_against(" data:image/gif;base64,R0lGOD", &base()),
            "data:image/gif;base64,R0lGOD"
        );
    }

    #[test]
    fn test_resolve_protocol_relative() {
        assert_eq!(
            resolve_against("//cdn.example.net/x.jpg", &base()),
            "https://cdn.example.net/x.jpg"
        );
    }

    #[test]
    fn test_resolve_keeps_absolute_and_data() {
        let absolute = "http://other.org/Img.PNG";
        assert_eq!(resolve_against(absolute, &base()), absolute);

        let data = "data:image/png;base64,AAAA";
        assert_eq!(resolve_against(data, &base()), data);

        assert_eq!(resolve_against("", &base()), "");
    }

    #[test]
    fn test_resolve_failure_keeps_original() {
        let weird = "http://[broken";
        // Looks like a scheme-qualified URL but cannot be parsed or joined.
        assert_eq!(resolve_against(weird, &base()), weird);
    }
}
