//! Error types for Marker Fetcher
//!
//! This module defines the error types for every component of the application.
//! Errors are designed to be actionable and carry enough context (URL, path,
//! status code) to diagnose a failed run without re-running it.
//!
//! Checksum mismatches are deliberately absent: verification answers with a
//! boolean and the acquisition loop decides what to do with it.

use std::path::PathBuf;
use thiserror::Error;

use crate::app::hash::InvalidHash;

/// Download and HTTP client errors
#[derive(Error, Debug)]
pub enum DownloadError {
    /// Upstream returned a non-success status
    #[error("API request failed with status {status}: {url}")]
    RequestFailed { status: u16, url: String },

    /// HTTP transport error
    #[error("HTTP request failed")]
    Http(#[from] reqwest::Error),

    /// Request exceeded the configured timeout
    #[error("Request timed out: {url}")]
    Timeout { url: String },

    /// Invalid URL provided or returned by the API
    #[error("Invalid URL: {url} - {error}")]
    InvalidUrl { url: String, error: String },

    /// A `next` link pointed at a page that was already fetched
    #[error("Pagination loop detected: {url} was already fetched")]
    PaginationLoop { url: String },

    /// Response body was not the expected JSON shape
    #[error("Failed to decode response from {url}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Accessions list acquisition errors
#[derive(Error, Debug)]
pub enum AcquisitionError {
    /// Every allowed download attempt produced an invalid artifact
    #[error("Failed to get valid accessions JSON after {attempts} attempts")]
    AccessionsUnobtainable { attempts: u32 },

    /// Verified artifact could not be parsed into accessions
    #[error("Verified accessions artifact could not be parsed")]
    Parse(#[from] serde_json::Error),
}

/// Local storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    /// Data directory could not be created or accessed
    #[error("Storage directory not accessible: {path}")]
    DirectoryNotAccessible {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Artifact could not be read
    #[error("Failed to read artifact: {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Artifact could not be written
    #[error("Failed to write artifact: {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Atomic rename of a fully written temp file failed
    #[error("Atomic file operation failed: could not rename {temp_path} to {final_path}")]
    AtomicOperationFailed {
        temp_path: PathBuf,
        final_path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// In-memory records could not be serialized
    #[error("Failed to serialize artifact: {path}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    /// Configuration file could not be read
    #[error("Failed to read configuration file: {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file could not be written
    #[error("Failed to write configuration file: {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration format
    #[error("Invalid configuration format")]
    InvalidFormat(#[from] toml::de::Error),

    /// Configuration could not be rendered
    #[error("Failed to render configuration")]
    Render(#[from] toml::ser::Error),

    /// Invalid configuration value
    #[error("Invalid configuration value for {field}: {value}. {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Top-level application error that can represent any error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Download error
    #[error(transparent)]
    Download(#[from] DownloadError),

    /// Acquisition error
    #[error(transparent)]
    Acquisition(#[from] AcquisitionError),

    /// Storage error
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A compiled-in reference digest is malformed
    #[error("Reference checksum table is corrupt")]
    ChecksumTable(#[from] InvalidHash),

    /// Generic application error with context
    #[error("Application error: {message}")]
    Generic { message: String },
}

impl AppError {
    /// Create a generic application error with a message
    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
        }
    }

    /// Get error category for logging and structured reports
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Download(DownloadError::RequestFailed { .. }) => "request_failed",
            AppError::Download(_) => "download",
            AppError::Acquisition(AcquisitionError::AccessionsUnobtainable { .. }) => {
                "accessions_unobtainable"
            }
            AppError::Acquisition(_) => "acquisition",
            AppError::Storage(_) => "storage_unavailable",
            AppError::Config(_) => "config",
            AppError::ChecksumTable(_) => "checksum_table",
            AppError::Generic { .. } => "generic",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

/// Download result type alias
pub type DownloadResult<T> = std::result::Result<T, DownloadError>;

/// Storage result type alias
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Configuration result type alias
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
