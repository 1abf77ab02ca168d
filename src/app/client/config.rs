//! HTTP client configuration and building logic

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::constants::{api, http, limits};
use crate::errors::DownloadError;

/// Configuration for the upstream API client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the API; endpoint paths are joined onto it
    pub base_url: String,
    /// Per-request timeout, covering connect through body
    pub request_timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
    /// Minimum spacing between any two requests
    pub min_request_interval: Duration,
    /// Extra random delay added on top of the interval
    pub rate_limit_jitter: Duration,
    /// TCP nodelay (disable Nagle's algorithm)
    pub tcp_nodelay: bool,
    /// Connection pool idle timeout
    pub pool_idle_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: api::BASE_URL.to_string(),
            request_timeout: http::DEFAULT_TIMEOUT,
            connect_timeout: http::CONNECT_TIMEOUT,
            min_request_interval: limits::DEFAULT_MIN_REQUEST_INTERVAL,
            rate_limit_jitter: Duration::ZERO,
            tcp_nodelay: true,
            pool_idle_timeout: Some(http::POOL_IDLE_TIMEOUT),
        }
    }
}

impl ClientConfig {
    /// Builds the reqwest client with the configured timeouts
    pub fn build_http_client(&self) -> Result<Client, DownloadError> {
        let mut client_builder = Client::builder()
            .timeout(self.request_timeout)
            .connect_timeout(self.connect_timeout)
            .user_agent(http::USER_AGENT)
            .tcp_nodelay(self.tcp_nodelay);

        if let Some(idle_timeout) = self.pool_idle_timeout {
            client_builder = client_builder.pool_idle_timeout(idle_timeout);
        }

        client_builder.build().map_err(DownloadError::Http)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, api::BASE_URL);
        assert_eq!(config.min_request_interval, Duration::from_millis(5000));
        assert_eq!(config.request_timeout, http::DEFAULT_TIMEOUT);
        assert!(config.rate_limit_jitter.is_zero());
    }

    #[test]
    fn test_http_client_with_custom_config() {
        let config = ClientConfig {
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            pool_idle_timeout: None,
            ..Default::default()
        };

        assert!(config.build_http_client().is_ok());
    }
}
