//! Download orchestration
//!
//! The orchestrator is the control plane of a run:
//!
//! 1. bootstrap the storage layout,
//! 2. acquire a verified accession list (sequential, blocking),
//! 3. fan out one pipeline per accession (skip check → paginate → sort →
//!    write) and run them all concurrently,
//! 4. join them, failing the run if any pipeline failed.
//!
//! Pipelines share nothing but the rate limiter inside the [`ApiClient`];
//! each writes only its own marker artifact.
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use marker_fetcher::app::{
//!     ApiClient, ChecksumTable, ChecksumVerifier, ClientConfig, DownloadOrchestrator,
//!     OrchestratorConfig, StorageLayout,
//! };
//!
//! # async fn example() -> marker_fetcher::Result<()> {
//! let client = Arc::new(ApiClient::from_config(&ClientConfig::default())?);
//! let verifier = Arc::new(ChecksumVerifier::new(
//!     ChecksumTable::reference()?,
//!     StorageLayout::default(),
//! ));
//!
//! let orchestrator = DownloadOrchestrator::new(OrchestratorConfig::default(), client, verifier);
//! let summary = orchestrator.run().await?;
//! println!("Finished in {}s", summary.runtime_duration_in_seconds);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod stats;

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use futures::future::try_join_all;
use tracing::{error, info};

use crate::app::acquirer::AccessionAcquirer;
use crate::app::checksum::ChecksumVerifier;
use crate::app::client::ApiClient;
use crate::app::models::{Accession, RunSummary};
use crate::app::ordering::MarkerOrderer;
use crate::app::paginator::MarkerPaginator;
use crate::app::storage;
use crate::errors::{AppError, Result};

pub use config::OrchestratorConfig;
pub use stats::{AccessionOutcome, RunStats};

/// Runs a complete download of accessions and their markers
#[derive(Debug, Clone)]
pub struct DownloadOrchestrator {
    config: OrchestratorConfig,
    client: Arc<ApiClient>,
    verifier: Arc<ChecksumVerifier>,
}

impl DownloadOrchestrator {
    pub fn new(
        config: OrchestratorConfig,
        client: Arc<ApiClient>,
        verifier: Arc<ChecksumVerifier>,
    ) -> Self {
        Self {
            config,
            client,
            verifier,
        }
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Run the download and return the compact summary
    pub async fn run(&self) -> Result<RunSummary> {
        Ok(self.run_with_stats().await?.summary())
    }

    /// Run the download and return detailed statistics
    ///
    /// # Errors
    ///
    /// Fails if storage cannot be prepared, if no valid accession list can
    /// be obtained, or if any accession pipeline fails
    pub async fn run_with_stats(&self) -> Result<RunStats> {
        let session_start = Instant::now();
        let mut stats = RunStats {
            session_start: Utc::now(),
            ..Default::default()
        };

        self.config.validate().map_err(AppError::generic)?;
        self.verifier.layout().ensure_directories().await?;

        let acquirer = AccessionAcquirer::new(
            self.client.clone(),
            self.verifier.clone(),
            self.config.max_accession_attempts,
        );
        let acquired = acquirer.ensure().await?;
        stats.accession_download_attempts = acquired.download_attempts;
        stats.accessions_total = acquired.accessions.len();

        info!(
            "Starting marker downloads for {} accessions",
            acquired.accessions.len()
        );

        let paginator = MarkerPaginator::new(self.client.clone(), self.config.page_size);
        let orderer = MarkerOrderer::new(self.config.suffix_order);

        let pipelines = acquired
            .accessions
            .iter()
            .map(|accession| self.run_pipeline(accession, &paginator, &orderer));

        let outcomes = try_join_all(pipelines).await.map_err(|e| {
            error!("Download run failed: {}", e);
            e
        })?;
        for outcome in outcomes {
            stats.record(outcome);
        }

        stats.session_duration = session_start.elapsed();
        info!(
            "Finished downloading, sorting and writing markers: {} downloaded, {} skipped, {} markers in {:?}",
            stats.accessions_downloaded,
            stats.accessions_skipped,
            stats.markers_written,
            stats.session_duration
        );

        Ok(stats)
    }

    /// Skip check → paginate → sort → write, for one accession
    async fn run_pipeline(
        &self,
        accession: &Accession,
        paginator: &MarkerPaginator,
        orderer: &MarkerOrderer,
    ) -> Result<AccessionOutcome> {
        if self.verifier.verify_markers(&accession.id).await? {
            info!(
                "Valid markers file for chromosome {} already exists. Skipping...",
                accession.chromosome
            );
            return Ok(AccessionOutcome::Skipped);
        }

        info!(
            "Started downloading markers for chromosome {}",
            accession.chromosome
        );
        let mut markers = paginator.fetch_all(accession).await?;
        orderer.sort(&mut markers);

        let path = self.verifier.layout().marker_path(&accession.id);
        storage::write_json_atomic(&path, &markers).await?;

        info!(
            "Saved {} markers for chromosome {}",
            markers.len(),
            accession.chromosome
        );
        Ok(AccessionOutcome::Downloaded {
            markers: markers.len(),
        })
    }
}
