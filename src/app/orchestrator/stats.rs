//! Run statistics tracking

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::app::models::RunSummary;

/// What happened to one accession during a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessionOutcome {
    /// A checksum-valid artifact was already present
    Skipped,
    /// Markers were downloaded, sorted and written
    Downloaded { markers: usize },
}

/// Aggregated statistics of a download run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    /// Start time of the run
    pub session_start: DateTime<Utc>,
    /// Wall-clock duration of the run
    pub session_duration: Duration,
    /// Accession list downloads performed
    pub accession_download_attempts: u32,
    /// Accessions in the verified list
    pub accessions_total: usize,
    /// Accessions whose artifact was already valid
    pub accessions_skipped: usize,
    /// Accessions downloaded this run
    pub accessions_downloaded: usize,
    /// Markers written across all downloaded accessions
    pub markers_written: usize,
}

impl Default for RunStats {
    fn default() -> Self {
        Self {
            session_start: Utc::now(),
            session_duration: Duration::ZERO,
            accession_download_attempts: 0,
            accessions_total: 0,
            accessions_skipped: 0,
            accessions_downloaded: 0,
            markers_written: 0,
        }
    }
}

impl RunStats {
    /// Fold one accession's outcome into the totals
    pub fn record(&mut self, outcome: AccessionOutcome) {
        match outcome {
            AccessionOutcome::Skipped => self.accessions_skipped += 1,
            AccessionOutcome::Downloaded { markers } => {
                self.accessions_downloaded += 1;
                self.markers_written += markers;
            }
        }
    }

    /// Compact summary returned to callers
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            runtime_duration_in_seconds: self.session_duration.as_secs(),
            accession_download_attempt_count: self.accession_download_attempts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_outcomes() {
        let mut stats = RunStats::default();
        stats.record(AccessionOutcome::Skipped);
        stats.record(AccessionOutcome::Downloaded { markers: 10 });
        stats.record(AccessionOutcome::Downloaded { markers: 5 });

        assert_eq!(stats.accessions_skipped, 1);
        assert_eq!(stats.accessions_downloaded, 2);
        assert_eq!(stats.markers_written, 15);
    }

    #[test]
    fn test_summary_floors_duration() {
        let stats = RunStats {
            session_duration: Duration::from_millis(2999),
            accession_download_attempts: 2,
            ..Default::default()
        };

        let summary = stats.summary();
        assert_eq!(summary.runtime_duration_in_seconds, 2);
        assert_eq!(summary.accession_download_attempt_count, 2);
    }
}
