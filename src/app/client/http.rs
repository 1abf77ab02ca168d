//! HTTP transport for the upstream API
//!
//! The transport is the only place that touches the network. It performs a
//! single GET and returns the body; rate limiting and decoding happen one
//! layer up in [`ApiClient`](super::ApiClient), so tests can swap in an
//! in-memory transport and still exercise both.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::errors::{DownloadError, DownloadResult};

use super::config::ClientConfig;

/// Fetches raw response bodies
#[async_trait]
pub trait ApiTransport: Send + Sync {
    /// GET `url` and return the body of a successful response
    ///
    /// # Errors
    ///
    /// Returns `DownloadError::RequestFailed` for a non-success status and
    /// `DownloadError::Timeout` if the request exceeded its deadline
    async fn get(&self, url: &Url) -> DownloadResult<Vec<u8>>;
}

/// reqwest-backed transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_config(config: &ClientConfig) -> DownloadResult<Self> {
        Ok(Self::new(config.build_http_client()?))
    }

    /// Get a reference to the underlying HTTP client
    pub fn client(&self) -> &Client {
        &self.client
    }

    fn map_error(url: &Url, error: reqwest::Error) -> DownloadError {
        if error.is_timeout() {
            DownloadError::Timeout {
                url: url.to_string(),
            }
        } else {
            DownloadError::Http(error)
        }
    }
}

#[async_trait]
impl ApiTransport for HttpTransport {
    async fn get(&self, url: &Url) -> DownloadResult<Vec<u8>> {
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| Self::map_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::RequestFailed {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Self::map_error(url, e))?;
        debug!("Fetched {} bytes from {}", bytes.len(), url);
        Ok(bytes.to_vec())
    }
}
