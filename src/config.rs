//! Configuration management for Marker Fetcher
//!
//! This module provides TOML configuration with multi-source lookup and
//! zero-config defaults. Durations are written in human-readable form
//! (`"5s"`, `"1m"`).

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::app::{ClientConfig, OrchestratorConfig, StorageLayout, SuffixOrder};
use crate::constants::{api, config as paths, files, http, limits, logging};
use crate::errors::{ConfigError, ConfigResult};

/// Unified application configuration for TOML serialization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Upstream API client settings
    pub client: ClientConfigToml,
    /// Download run settings
    pub download: DownloadConfigToml,
    /// Artifact storage settings
    pub storage: StorageConfigToml,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// TOML-friendly client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfigToml {
    /// Base URL of the API
    pub base_url: String,
    /// Per-request timeout
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
    /// Connect timeout
    #[serde(with = "humantime_serde")]
    pub connect_timeout: Duration,
    /// Minimum spacing between any two requests
    #[serde(with = "humantime_serde")]
    pub min_request_interval: Duration,
    /// Random delay added on top of the interval
    #[serde(with = "humantime_serde")]
    pub rate_limit_jitter: Duration,
    /// TCP nodelay setting
    pub tcp_nodelay: bool,
    /// Connection pool idle timeout (None = no timeout)
    #[serde(
        with = "humantime_serde",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub pool_idle_timeout: Option<Duration>,
}

impl Default for ClientConfigToml {
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

/// TOML-friendly download configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadConfigToml {
    /// Markers requested per page
    pub page_size: u32,
    /// Accession list downloads allowed before giving up
    pub max_accession_attempts: u32,
    /// RSID suffix tie-break: "descending" or "ascending"
    pub suffix_order: SuffixOrder,
}

impl Default for DownloadConfigToml {
    fn default() -> Self {
        Self {
            page_size: api::DEFAULT_PAGE_SIZE,
            max_accession_attempts: limits::MAX_ACCESSION_DOWNLOAD_ATTEMPTS,
            suffix_order: SuffixOrder::default(),
        }
    }
}

/// TOML-friendly storage configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfigToml {
    /// Root directory for all artifacts
    pub data_root: PathBuf,
}

impl Default for StorageConfigToml {
    fn default() -> Self {
        Self {
            data_root: PathBuf::from(files::DEFAULT_DATA_ROOT),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default log level when no verbosity flag is given
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: logging::DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration with precedence:
    /// 1. Explicit config file
    /// 2. `./marker-fetcher.toml`
    /// 3. User config directory
    /// 4. Default values
    ///
    /// An explicit file that does not exist is an error; missing default
    /// locations are skipped.
    pub async fn load(config_file_override: Option<PathBuf>) -> ConfigResult<Self> {
        if let Some(path) = config_file_override {
            if !path.exists() {
                return Err(ConfigError::NotFound { path });
            }
            return Self::load_from_file(&path).await;
        }

        match Self::find_config_file() {
            Some(path) => Self::load_from_file(&path).await,
            None => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let mut search_paths = vec![PathBuf::from(paths::LOCAL_CONFIG_FILE)];
        if let Ok(user_config) = Self::default_config_path() {
            search_paths.push(user_config);
        }

        search_paths.into_iter().find(|path| {
            let found = path.exists();
            if found {
                debug!("Found config file: {}", path.display());
            }
            found
        })
    }

    /// Get the default config file path for the current user
    pub fn default_config_path() -> ConfigResult<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| ConfigError::InvalidValue {
            field: "config_dir".to_string(),
            value: String::new(),
            reason: "Could not determine user config directory".to_string(),
        })?;

        Ok(config_dir
            .join(paths::APP_DIR_NAME)
            .join(paths::CONFIG_FILE_NAME))
    }

    /// Load configuration from a TOML file
    pub async fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;

        info!("Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Reject values that would make a run impossible
    pub fn validate(&self) -> ConfigResult<()> {
        if self.client.min_request_interval.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "client.min_request_interval".to_string(),
                value: "0s".to_string(),
                reason: "Request interval must be positive".to_string(),
            });
        }

        if self.download.page_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "download.page_size".to_string(),
                value: "0".to_string(),
                reason: "Page size must be positive".to_string(),
            });
        }

        if self.download.max_accession_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "download.max_accession_attempts".to_string(),
                value: "0".to_string(),
                reason: "At least one download attempt is required".to_string(),
            });
        }

        Ok(())
    }

    /// Render the effective configuration as TOML
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write a commented default configuration file, creating parent directories
    pub async fn write_default(path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| ConfigError::Write {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        tokio::fs::write(path, Self::generate_default_config_content())
            .await
            .map_err(|source| ConfigError::Write {
                path: path.to_path_buf(),
                source,
            })?;

        info!("Wrote default configuration to: {}", path.display());
        Ok(())
    }

    /// Generate default configuration content with helpful comments
    pub fn generate_default_config_content() -> String {
        format!(
            r#"# Marker Fetcher Configuration
# Durations accept human-readable values such as "500ms", "5s" or "1m".

[client]
base_url = "{}"
request_timeout = "{}"
connect_timeout = "{}"
# Minimum spacing between any two requests, shared by all downloads
min_request_interval = "{}"
rate_limit_jitter = "0s"
tcp_nodelay = true
pool_idle_timeout = "{}"

[download]
page_size = {}
max_accession_attempts = {}
# RSID suffix tie-break; "descending" reproduces the published checksums
suffix_order = "descending"

[storage]
data_root = "{}"

[logging]
level = "{}"  # error, warn, info, debug, trace
"#,
            api::BASE_URL,
            humantime_serde::re::humantime::format_duration(http::DEFAULT_TIMEOUT),
            humantime_serde::re::humantime::format_duration(http::CONNECT_TIMEOUT),
            humantime_serde::re::humantime::format_duration(limits::DEFAULT_MIN_REQUEST_INTERVAL),
            humantime_serde::re::humantime::format_duration(http::POOL_IDLE_TIMEOUT),
            api::DEFAULT_PAGE_SIZE,
            limits::MAX_ACCESSION_DOWNLOAD_ATTEMPTS,
            files::DEFAULT_DATA_ROOT,
            logging::DEFAULT_LOG_LEVEL,
        )
    }

    /// Storage layout rooted at the configured data root
    pub fn storage_layout(&self) -> StorageLayout {
        StorageLayout::new(&self.storage.data_root)
    }
}

impl ClientConfigToml {
    /// Convert to runtime ClientConfig
    pub fn to_runtime_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.base_url.clone(),
            request_timeout: self.request_timeout,
            connect_timeout: self.connect_timeout,
            min_request_interval: self.min_request_interval,
            rate_limit_jitter: self.rate_limit_jitter,
            tcp_nodelay: self.tcp_nodelay,
            pool_idle_timeout: self.pool_idle_timeout,
        }
    }
}

impl DownloadConfigToml {
    /// Convert to runtime OrchestratorConfig
    pub fn to_runtime_config(&self) -> OrchestratorConfig {
        OrchestratorConfig {
            page_size: self.page_size,
            max_accession_attempts: self.max_accession_attempts,
            suffix_order: self.suffix_order,
        }
    }
}
