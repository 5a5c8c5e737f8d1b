//! CORS configuration for the metatags-web server
//!
//! By default only browser pages served from this machine may call the API:
//!
//! - **Allowed Origins**: `localhost`, `127.0.0.1` and `[::1]` on any port,
//!   over `http` or `https`
//! - **Allowed Methods**: GET, POST, OPTIONS (preflight)
//! - **Allowed Headers**: Content-Type
//! - **Max Age**: 3600 seconds for preflight caching
//!
//! A front end hosted elsewhere needs the permissive layer
//! (`METATAGS_WEB_CORS_PERMISSIVE=true` or `serve --cors-permissive`).

use http::{header::HeaderValue, Method};
use std::net::Ipv4Addr;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use url::{Host, Url};

/// Allowed request headers
pub const ALLOWED_HEADERS: [http::header::HeaderName; 1] = [http::header::CONTENT_TYPE];

/// Allowed methods
pub const ALLOWED_METHODS: [Method; 3] = [Method::GET, Method::POST, Method::OPTIONS];

/// Preflight cache lifetime
pub const DEFAULT_MAX_AGE_SECS: u64 = 3600;

/// CORS layer accepting only loopback origins
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(|origin, _| is_localhost_origin(origin)))
        .allow_methods(ALLOWED_METHODS)
        .allow_headers(ALLOWED_HEADERS)
        .max_age(Duration::from_secs(DEFAULT_MAX_AGE_SECS))
}

/// CORS layer accepting any origin
pub fn cors_layer_permissive() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(Duration::from_secs(DEFAULT_MAX_AGE_SECS))
}

/// Pick the layer for `permissive`
pub fn cors_for(permissive: bool) -> CorsLayer {
    if permissive {
        cors_layer_permissive()
    } else {
        cors_layer()
    }
}

/// Whether `origin` is an http(s) origin on a loopback host.
///
/// An origin is `scheme://host[:port]`; anything with a path, credentials or
/// a non-loopback host is rejected.
pub fn is_localhost_origin(origin: &HeaderValue) -> bool {
    let Ok(origin) = origin.to_str() else {
        return false;
    };
    let Ok(url) = Url::parse(origin) else {
        return false;
    };

    if !matches!(url.scheme(), "http" | "https") {
        return false;
    }
    if !url.username().is_empty() || url.password().is_some() {
        return false;
    }
    // Url normalizes an empty path to "/", so a literal trailing slash is
    // detected on the raw string
    if url.path() != "/" || origin.ends_with('/') || url.query().is_some() {
        return false;
    }

    match url.host() {
        Some(Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
        Some(Host::Ipv4(ip)) => ip == Ipv4Addr::LOCALHOST,
        Some(Host::Ipv6(ip)) => ip.is_loopback(),
        None => false,
    }
}
