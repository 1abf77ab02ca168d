//! Bounded acquisition of a verified accessions list
//!
//! The accessions artifact is downloaded until its checksum matches or the
//! attempt ceiling is hit:
//!
//! ```text
//! Unverified ──download──▶ Downloading ──verify ok──▶ Verified
//!      ▲                        │
//!      └────── verify failed ───┘   (attempt > ceiling ⇒ AccessionsUnobtainable)
//! ```
//!
//! Only checksum mismatches feed the retry loop. Transport and status errors
//! abort acquisition immediately.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::app::checksum::ChecksumVerifier;
use crate::app::client::ApiClient;
use crate::app::models::{normalize_numbers, Accession};
use crate::app::storage;
use crate::constants::limits;
use crate::errors::{AcquisitionError, Result};

/// Verified accessions plus the downloads it took to get them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcquiredAccessions {
    pub accessions: Vec<Accession>,
    /// Downloads performed; zero when a valid artifact was already on disk
    pub download_attempts: u32,
}

/// Ensures a checksum-valid accessions artifact exists locally
#[derive(Debug, Clone)]
pub struct AccessionAcquirer {
    client: Arc<ApiClient>,
    verifier: Arc<ChecksumVerifier>,
    max_attempts: u32,
}

impl AccessionAcquirer {
    pub fn new(client: Arc<ApiClient>, verifier: Arc<ChecksumVerifier>, max_attempts: u32) -> Self {
        Self {
            client,
            verifier,
            max_attempts,
        }
    }

    pub fn with_default_attempts(client: Arc<ApiClient>, verifier: Arc<ChecksumVerifier>) -> Self {
        Self::new(client, verifier, limits::MAX_ACCESSION_DOWNLOAD_ATTEMPTS)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Return the verified accession list, downloading it if necessary
    ///
    /// # Errors
    ///
    /// Returns `AcquisitionError::AccessionsUnobtainable` once `max_attempts`
    /// downloads have all failed verification, and propagates download and
    /// storage errors as they occur
    pub async fn ensure(&self) -> Result<AcquiredAccessions> {
        let mut attempts = 0u32;

        while !self.verifier.verify_accessions().await? {
            attempts += 1;
            if attempts > self.max_attempts {
                warn!(
                    "Accessions artifact still invalid after {} downloads",
                    self.max_attempts
                );
                return Err(AcquisitionError::AccessionsUnobtainable {
                    attempts: self.max_attempts,
                }
                .into());
            }

            info!(
                "Downloading accessions (attempt {}/{})",
                attempts, self.max_attempts
            );
            self.download().await?;
        }

        let accessions = self.read_accessions().await?;
        info!(
            "Accessions verified: {} accessions after {} downloads",
            accessions.len(),
            attempts
        );

        Ok(AcquiredAccessions {
            accessions,
            download_attempts: attempts,
        })
    }

    /// Fetch the accession list and overwrite the local artifact
    async fn download(&self) -> Result<()> {
        let url = self.client.accessions_url()?;
        // Records are kept as raw JSON so the artifact reproduces the API's
        // field order and extra fields byte for byte.
        let mut page = self.client.fetch_page::<serde_json::Value>(&url).await?;
        page.data.iter_mut().for_each(normalize_numbers);

        if let Some(next) = &page.links.next {
            warn!(
                "Accession list is paginated (next: {}); only the first page is stored",
                next
            );
        }

        let path = self.verifier.layout().accessions_path();
        storage::write_json_atomic(&path, &page.data).await?;
        debug!("Stored {} accession records", page.data.len());
        Ok(())
    }

    async fn read_accessions(&self) -> Result<Vec<Accession>> {
        let path = self.verifier.layout().accessions_path();
        let content = storage::read(&path).await?;
        let accessions =
            serde_json::from_slice(&content).map_err(AcquisitionError::Parse)?;
        Ok(accessions)
    }
}
