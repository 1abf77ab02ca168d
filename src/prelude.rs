//! Prelude module for Marker Fetcher Library
//!
//! Re-exports the items needed for a typical download with a single
//! `use marker_fetcher::prelude::*;` statement.
//!
//! # Usage
//!
//! ```rust,no_run
//! use marker_fetcher::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = Arc::new(ApiClient::from_config(&ClientConfig::default())?);
//!     let verifier = Arc::new(ChecksumVerifier::new(
//!         ChecksumTable::reference()?,
//!         StorageLayout::default(),
//!     ));
//!
//!     let summary = DownloadOrchestrator::new(OrchestratorConfig::default(), client, verifier)
//!         .run()
//!         .await?;
//!     println!("{}", serde_json::to_string(&summary).unwrap());
//!     Ok(())
//! }
//! ```

// Core result types
pub use crate::errors::{AppError, Result};

// Engine components
pub use crate::app::{
    ApiClient, ChecksumTable, ChecksumVerifier, ClientConfig, DownloadOrchestrator,
    OrchestratorConfig, RateLimiter, StorageLayout, SuffixOrder,
};

// Data and report types
pub use crate::app::{Accession, Marker, Response, RunSummary, ValidationReport};

// Configuration
pub use crate::config::AppConfig;
