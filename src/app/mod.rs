//! Core application logic for Marker Fetcher
//!
//! This module contains the download engine: the rate-limited API client,
//! checksum verification, pagination, canonical marker ordering, accession
//! acquisition and the orchestrator tying them together.
//!
//! # Examples
//!
//! ```rust,no_run
//! use marker_fetcher::app::{ChecksumTable, ChecksumVerifier, StorageLayout};
//!
//! # async fn example() -> marker_fetcher::Result<()> {
//! let verifier = ChecksumVerifier::new(ChecksumTable::reference()?, StorageLayout::default());
//! let report = verifier.validate_all().await?;
//!
//! for id in report.invalid_markers() {
//!     println!("Invalid or missing markers: {}", id);
//! }
//! # Ok(())
//! # }
//! ```

pub mod acquirer;
pub mod checksum;
pub mod client;
pub mod hash;
pub mod models;
pub mod orchestrator;
pub mod ordering;
pub mod paginator;
pub mod rate_limit;
pub mod report;
pub mod storage;

// Re-export main public API
pub use acquirer::{AccessionAcquirer, AcquiredAccessions};
pub use checksum::{ChecksumTable, ChecksumVerifier, ValidationReport};
pub use client::{ApiClient, ApiTransport, ClientConfig, HttpTransport, MemoryTransport};
pub use hash::Sha256Hash;
pub use models::{Accession, InvalidMarker, Marker, Page, PageLinks, RunSummary};
pub use orchestrator::{DownloadOrchestrator, OrchestratorConfig, RunStats};
pub use ordering::{MarkerOrderer, SuffixOrder};
pub use paginator::MarkerPaginator;
pub use rate_limit::RateLimiter;
pub use report::{ErrorReport, Response};
pub use storage::StorageLayout;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_structure() {
        // Ensure public API is accessible
        let config = ClientConfig::default();
        assert!(config.tcp_nodelay);
        assert_eq!(ChecksumTable::reference().unwrap().len(), 25);
        assert_eq!(SuffixOrder::default(), SuffixOrder::Descending);
    }
}
