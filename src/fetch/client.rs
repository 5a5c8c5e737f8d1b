//! HTTP page fetcher
//!
//! A single GET per check, with a fixed identifying `User-Agent`, redirects
//! followed transparently, and no caching or retries.

use crate::config::FetchConfig;
use crate::error::{Error, Result};
use reqwest::redirect::Policy;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// The retrieved page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Effective URL after redirects; the base for relative references
    pub final_url: Url,
    /// Final HTTP status code (always 2xx)
    pub status: u16,
    /// Response body decoded as text
    pub body: String,
}

/// Page fetcher backed by a pooled `reqwest::Client`
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: reqwest::Client,
    config: FetchConfig,
}

impl PageFetcher {
    /// Create a fetcher with the default identity and redirect policy
    pub fn new() -> Result<Self> {
        Self::with_config(FetchConfig::default())
    }

    /// Create a fetcher from explicit settings
    pub fn with_config(config: FetchConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .redirect(Policy::limited(config.max_redirects));

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Settings this fetcher was built with
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Retrieve the HTML body of `url`.
    ///
    /// # Errors
    ///
    /// - `Error::Network` when the host cannot be reached or the body cannot
    ///   be read
    /// - `Error::FetchFailed` when the final response is not 2xx
    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch(&self, url: &Url) -> Result<FetchedPage> {
        let started = Instant::now();

        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            let cause = error_chain(&e);
            warn!(cause = %cause, "Request failed");
            Error::network(cause)
        })?;

        let status = response.status();
        let final_url = response.url().clone();

        if final_url != *url {
            debug!(final_url = %final_url, "Followed redirects");
        }

        if !status.is_success() {
            warn!(status = status.as_u16(), "Upstream returned non-success status");
            return Err(Error::FetchFailed {
                status_code: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::network(error_chain(&e)))?;

        info!(
            status = status.as_u16(),
            bytes = body.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Fetched page"
        );

        Ok(FetchedPage {
            final_url,
            status: status.as_u16(),
            body,
        })
    }
}

/// Flatten an error and its sources into one message
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
