//! Extraction pipeline
//!
//! Normalize → fetch → parse → extract → resolve JSON-LD → assemble.
//!
//! The fetch is the only await point. The parsed tree is built and dropped
//! inside the synchronous [`extract_page`] call, so the returned future is
//! `Send` and unrelated checks can run concurrently on a shared pipeline.

use crate::config::FetchConfig;
use crate::error::Result;
use crate::extraction::{extract_page, PageMetadata};
use crate::fetch::{normalize_url, PageFetcher};
use tracing::{info, instrument};
use url::Url;

/// Outcome of one successful check
#[derive(Debug, Clone)]
pub struct PageCheck {
    /// URL after normalization, before redirects
    pub requested_url: Url,
    /// Final URL the metadata was resolved against
    pub final_url: Url,
    /// Extracted record
    pub metadata: PageMetadata,
}

/// The page-metadata extraction pipeline
#[derive(Debug, Clone)]
pub struct MetadataPipeline {
    fetcher: PageFetcher,
}

impl MetadataPipeline {
    /// Create a pipeline with the default fetcher
    pub fn new() -> Result<Self> {
        Ok(Self::with_fetcher(PageFetcher::new()?))
    }

    /// Create a pipeline from fetcher settings
    pub fn with_config(config: FetchConfig) -> Result<Self> {
        Ok(Self::with_fetcher(PageFetcher::with_config(config)?))
    }

    /// Create a pipeline around an existing fetcher
    pub fn with_fetcher(fetcher: PageFetcher) -> Self {
        Self { fetcher }
    }

    /// Extract the metadata record for user input `raw_url_input`.
    ///
    /// # Errors
    ///
    /// `InvalidUrl` (before any request), `Network` or `FetchFailed`.
    pub async fn extract_metadata(&self, raw_url_input: &str) -> Result<PageMetadata> {
        Ok(self.check(raw_url_input).await?.metadata)
    }

    /// Like [`extract_metadata`](Self::extract_metadata), keeping the
    /// requested and final URLs
    #[instrument(skip(self))]
    pub async fn check(&self, raw_url_input: &str) -> Result<PageCheck> {
        let requested_url = normalize_url(raw_url_input)?;
        let page = self.fetcher.fetch(&requested_url).await?;
        let metadata = extract_page(&page.body, &page.final_url);

        info!(
            final_url = %page.final_url,
            has_schema = metadata.schema.is_some(),
            "Extracted metadata"
        );

        Ok(PageCheck {
            requested_url,
            final_url: page.final_url,
            metadata,
        })
    }
}
