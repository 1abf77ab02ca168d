//! Rate-limited client for the genomic reference API
//!
//! The module is organized into specialized components:
//! - `config`: HTTP client configuration and building
//! - `http`: the transport seam and its reqwest implementation
//! - `memory`: canned-response transport for offline replay
//!
//! [`ApiClient`] owns the URL scheme of the API and funnels every request
//! through the shared [`RateLimiter`] before handing it to the transport.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::app::models::Page;
use crate::app::rate_limit::RateLimiter;
use crate::constants::api;
use crate::errors::{DownloadError, DownloadResult, Result};

pub mod config;
pub mod http;
pub mod memory;

pub use config::ClientConfig;
pub use http::{ApiTransport, HttpTransport};
pub use memory::{CannedResponse, MemoryTransport};

/// Client for the accession and marker endpoints
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn ApiTransport>,
    limiter: Arc<RateLimiter>,
    base_url: Url,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("limiter", &self.limiter)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Creates a client from its parts
    ///
    /// The limiter is shared, not owned: every client built from the same
    /// `Arc` draws from one request budget.
    pub fn new(
        transport: Arc<dyn ApiTransport>,
        limiter: Arc<RateLimiter>,
        base_url: Url,
    ) -> Self {
        Self {
            transport,
            limiter,
            base_url: Self::normalize_base(base_url),
        }
    }

    /// Creates a reqwest-backed client with a fresh limiter
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid, the interval is zero or
    /// the HTTP client cannot be built
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| DownloadError::InvalidUrl {
            url: config.base_url.clone(),
            error: e.to_string(),
        })?;
        let limiter = Arc::new(RateLimiter::with_jitter(
            config.min_request_interval,
            config.rate_limit_jitter,
        )?);
        let transport = Arc::new(HttpTransport::from_config(config)?);

        tracing::info!(
            "Created API client for {} ({:?} between requests)",
            base_url,
            config.min_request_interval
        );

        Ok(Self::new(transport, limiter, base_url))
    }

    // Url::join drops the last path segment unless the base ends in '/'
    fn normalize_base(mut base_url: Url) -> Url {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        base_url
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    /// URL of the accession list
    pub fn accessions_url(&self) -> DownloadResult<Url> {
        self.resolve(api::ACCESSION_PATH)
    }

    /// URL of the first marker page for an accession
    pub fn markers_url(&self, accession_id: &str, page_size: u32) -> DownloadResult<Url> {
        let mut url = self.resolve(api::MARKER_PATH)?;
        url.query_pairs_mut()
            .append_pair("accession_id", accession_id)
            .append_pair("limit", &page_size.to_string());
        Ok(url)
    }

    /// Resolve a link returned by the API
    ///
    /// Absolute links are used as-is; relative ones are joined onto the base.
    pub fn resolve(&self, link: &str) -> DownloadResult<Url> {
        self.base_url
            .join(link)
            .map_err(|e| DownloadError::InvalidUrl {
                url: link.to_string(),
                error: e.to_string(),
            })
    }

    /// Fetch and decode one page, waiting on the rate limiter first
    pub async fn fetch_page<T: DeserializeOwned>(&self, url: &Url) -> DownloadResult<Page<T>> {
        self.limiter.acquire().await;
        let body = self.transport.get(url).await?;

        let page: Page<T> =
            serde_json::from_slice(&body).map_err(|source| DownloadError::Decode {
                url: url.to_string(),
                source,
            })?;
        debug!("Decoded page of {} records from {}", page.data.len(), url);
        Ok(page)
    }
}
