//! Error types for metatags-web
//!
//! Only three failures are fatal to the extraction pipeline: an input that
//! cannot become a URL, a transport failure, and a non-2xx final response.
//! Everything else (malformed HTML, broken JSON-LD blocks, unresolvable
//! relative URLs) is absorbed by the extractor with a documented fallback.

use thiserror::Error;

/// The main error type for metatags-web operations
#[derive(Error, Debug)]
pub enum Error {
    /// Input could not be turned into a URL, even after scheme prefixing
    #[error("Invalid URL: {input}")]
    InvalidUrl {
        /// The raw input as supplied by the caller
        input: String,
    },

    /// Transport-level failure reaching the target host
    #[error("Network error: {cause}")]
    Network {
        /// Underlying cause reported by the HTTP client
        cause: String,
    },

    /// Target responded with a non-2xx final status
    #[error("Failed to fetch URL: {status_code} {status_text}")]
    FetchFailed {
        /// HTTP status code of the final response
        status_code: u16,
        /// Canonical reason phrase (empty when unknown)
        status_text: String,
    },

    /// Invalid runtime configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for metatags-web operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an invalid-URL error echoing the offending input
    pub fn invalid_url<S: Into<String>>(input: S) -> Self {
        Error::InvalidUrl {
            input: input.into(),
        }
    }

    /// Create a network error from any displayable cause
    pub fn network<E: std::fmt::Display>(cause: E) -> Self {
        Error::Network {
            cause: cause.to_string(),
        }
    }

    /// HTTP status an API response should carry for this error.
    ///
    /// Invalid input maps to 400, upstream failures mirror the upstream
    /// status, everything else is a 500.
    pub fn http_status(&self) -> u16 {
        match self {
            Error::InvalidUrl { .. } => 400,
            Error::FetchFailed { status_code, .. } => *status_code,
            _ => 500,
        }
    }

    /// Whether the target was reached for (or attempted) and failed, as
    /// opposed to input rejected before any request was made
    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, Error::Network { .. } | Error::FetchFailed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_url_display() {
        let err = Error::invalid_url("ht!tp:://");
        assert_eq!(err.to_string(), "Invalid URL: ht!tp:://");
        assert_eq!(err.http_status(), 400);
    }

    #[test]
    fn test_fetch_failed_display() {
        let err = Error::FetchFailed {
            status_code: 404,
            status_text: "Not Found".to_string(),
        };
        assert_eq!(err.to_string(), "Failed to fetch URL: 404 Not Found");
        assert_eq!(err.http_status(), 404);
    }

    #[test]
    fn test_network_error() {
        let err = Error::network("connection refused");
        assert!(err.to_string().contains("connection refused"));
        assert_eq!(err.http_status(), 500);
        assert!(err.is_fetch_failure());
    }

    #[test]
    fn test_only_transport_and_status_errors_are_fetch_failures() {
        assert!(!Error::invalid_url("http://").is_fetch_failure());
        let err = Error::Config("port must be non-zero".to_string());
        assert!(!err.is_fetch_failure());
        assert_eq!(err.http_status(), 500);
    }
}
