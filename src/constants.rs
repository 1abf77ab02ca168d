//! Application constants for Marker Fetcher
//!
//! This module centralizes all constants used throughout the application,
//! organized by functional domain for maintainability and clarity.

use std::time::Duration;

/// HTTP client configuration constants
pub mod http {
    use super::Duration;

    /// Default user agent for all HTTP requests
    pub const USER_AGENT: &str = concat!("Marker-Fetcher/", env!("CARGO_PKG_VERSION"));

    /// Default HTTP request timeout
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

    /// Connection establishment timeout
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Connection pool idle timeout
    pub const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);
}

/// Upstream API endpoints
pub mod api {
    /// Base URL of the genomic reference API
    pub const BASE_URL: &str = "https://api.23andme.com/3/";

    /// Accession list endpoint, relative to the base URL
    pub const ACCESSION_PATH: &str = "accession/";

    /// Marker endpoint, relative to the base URL
    pub const MARKER_PATH: &str = "marker/";

    /// Markers requested per page
    pub const DEFAULT_PAGE_SIZE: u32 = 10_000;
}

/// Rate limiting and retry configuration
pub mod limits {
    use super::Duration;

    /// Minimum spacing between any two outbound requests
    pub const DEFAULT_MIN_REQUEST_INTERVAL: Duration = Duration::from_millis(5000);

    /// Maximum accession list downloads before giving up
    pub const MAX_ACCESSION_DOWNLOAD_ATTEMPTS: u32 = 5;
}

/// File operation constants
pub mod files {
    /// Default data root, relative to the working directory
    pub const DEFAULT_DATA_ROOT: &str = "data";

    /// Directory holding all JSON artifacts, under the data root
    pub const JSON_DIR: &str = "json";

    /// Directory holding per-accession marker artifacts, under the JSON dir
    pub const MARKERS_DIR: &str = "markers";

    /// File name of the accessions artifact
    pub const ACCESSIONS_FILE_NAME: &str = "accessions.json";

    /// Extension of per-accession marker artifacts
    pub const MARKER_FILE_EXTENSION: &str = "json";

    /// Temporary file suffix for atomic operations
    pub const TEMP_FILE_SUFFIX: &str = ".tmp";
}

/// Configuration file locations
pub mod config {
    /// Project-local configuration file name
    pub const LOCAL_CONFIG_FILE: &str = "marker-fetcher.toml";

    /// Directory name under the user's config directory
    pub const APP_DIR_NAME: &str = "marker-fetcher";

    /// Configuration file name under the app directory
    pub const CONFIG_FILE_NAME: &str = "config.toml";
}

/// Logging constants
pub mod logging {
    /// Default log level
    pub const DEFAULT_LOG_LEVEL: &str = "warn";
}

// Re-export commonly used constants for convenience
pub use api::DEFAULT_PAGE_SIZE;
pub use files::TEMP_FILE_SUFFIX;
pub use http::USER_AGENT;
pub use limits::{DEFAULT_MIN_REQUEST_INTERVAL, MAX_ACCESSION_DOWNLOAD_ATTEMPTS};
