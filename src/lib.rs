//! Marker Fetcher Library
//!
//! A Rust library for downloading genomic reference data, chromosome
//! accessions and their markers, from a paginated, rate-limited REST API.
//! Every artifact is verified against known SHA-256 checksums and written as
//! deterministically ordered JSON.

pub mod app;
pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;
pub mod prelude;

// Re-export commonly used types for convenience
pub use errors::{AppError, Result};

#[cfg(test)]
mod tests {
    use super::*;
    use constants::*;

    #[test]
    fn test_constants_accessible() {
        assert_eq!(DEFAULT_PAGE_SIZE, 10_000);
        assert_eq!(MAX_ACCESSION_DOWNLOAD_ATTEMPTS, 5);
        assert!(USER_AGENT.contains("Marker-Fetcher"));
    }

    #[test]
    fn test_error_types() {
        let error = errors::StorageError::AtomicOperationFailed {
            temp_path: "data/json/accessions.json.tmp".into(),
            final_path: "data/json/accessions.json".into(),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        let app_error = AppError::Storage(error);

        assert_eq!(app_error.category(), "storage_unavailable");
        assert!(std::error::Error::source(&app_error).is_some());
    }
}
