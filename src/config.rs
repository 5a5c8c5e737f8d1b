//! Runtime configuration
//!
//! Configuration is read from environment variables and can be overridden by
//! command-line flags in the binary.
//!
//! - `METATAGS_WEB_USER_AGENT`: client identity sent with every fetch
//!   (default: `Mozilla/5.0 (compatible; MetaTagsChecker/1.0)`)
//! - `METATAGS_WEB_MAX_REDIRECTS`: redirect hops followed (default: 10)
//! - `METATAGS_WEB_TIMEOUT_SECS`: optional fetch timeout, unset means none
//! - `METATAGS_WEB_BIND_ALL`: set to "true" to bind 0.0.0.0 (Docker)
//! - `METATAGS_WEB_PORT`: API port (default: 3001)
//! - `METATAGS_WEB_CORS_PERMISSIVE`: set to "true" to accept any origin

use crate::error::{Error, Result};
use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;
use tracing::{info, warn};

/// Identity string sent as `User-Agent`, distinguishable from browsers
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; MetaTagsChecker/1.0)";

/// Redirect hops followed before giving up
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

/// Default API port
pub const DEFAULT_PORT: u16 = 3001;

const ENV_USER_AGENT: &str = "METATAGS_WEB_USER_AGENT";
const ENV_MAX_REDIRECTS: &str = "METATAGS_WEB_MAX_REDIRECTS";
const ENV_TIMEOUT_SECS: &str = "METATAGS_WEB_TIMEOUT_SECS";
const ENV_BIND_ALL: &str = "METATAGS_WEB_BIND_ALL";
const ENV_PORT: &str = "METATAGS_WEB_PORT";
const ENV_CORS_PERMISSIVE: &str = "METATAGS_WEB_CORS_PERMISSIVE";

/// Settings for the page fetcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    /// `User-Agent` header value
    pub user_agent: String,
    /// Maximum redirects followed
    pub max_redirects: usize,
    /// Whole-request timeout; `None` leaves timing to the host
    pub timeout: Option<Duration>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_redirects: DEFAULT_MAX_REDIRECTS,
            timeout: None,
        }
    }
}

/// Settings for the HTTP API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Bind address derived from the bind-all flag
    pub bind_addr: IpAddr,
    /// Listening port
    pub port: u16,
    /// Accept cross-origin requests from any origin instead of localhost only
    pub permissive_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            permissive_cors: false,
        }
    }
}

impl ServerConfig {
    /// Socket address to bind
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
}

/// Complete runtime configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Fetcher settings
    pub fetch: FetchConfig,
    /// API server settings
    pub server: ServerConfig,
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` when a variable is set but malformed.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(agent) = lookup(ENV_USER_AGENT) {
            if agent.trim().is_empty() {
                return Err(Error::Config(format!("{ENV_USER_AGENT} cannot be empty")));
            }
            config.fetch.user_agent = agent;
        }

        if let Some(raw) = lookup(ENV_MAX_REDIRECTS) {
            config.fetch.max_redirects = raw
                .parse::<usize>()
                .map_err(|e| Error::Config(format!("{ENV_MAX_REDIRECTS}: {e}")))?;
        }

        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs = raw
                .parse::<u64>()
                .map_err(|e| Error::Config(format!("{ENV_TIMEOUT_SECS}: {e}")))?;
            if secs == 0 {
                return Err(Error::Config(format!("{ENV_TIMEOUT_SECS} cannot be 0")));
            }
            config.fetch.timeout = Some(Duration::from_secs(secs));
        }

        if is_true(lookup(ENV_BIND_ALL)) {
            warn!("Binding to 0.0.0.0 ({ENV_BIND_ALL}=true)");
            config.server.bind_addr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
        }

        if let Some(raw) = lookup(ENV_PORT) {
            let port = raw
                .parse::<u16>()
                .map_err(|e| Error::Config(format!("{ENV_PORT}: {e}")))?;
            if port == 0 {
                return Err(Error::Config(format!("{ENV_PORT} cannot be 0")));
            }
            config.server.port = port;
        }

        config.server.permissive_cors = is_true(lookup(ENV_CORS_PERMISSIVE));
        if config.server.permissive_cors {
            warn!("CORS is permissive: any origin may call the API");
        }

        info!(
            user_agent = %config.fetch.user_agent,
            max_redirects = config.fetch.max_redirects,
            "Configuration loaded"
        );

        Ok(config)
    }
}

fn is_true(value: Option<String>) -> bool {
    value.map(|v| v.eq_ignore_ascii_case("true")).unwrap_or(false)
}
