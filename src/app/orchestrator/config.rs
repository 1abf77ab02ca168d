//! Configuration structures for the download orchestrator

use serde::{Deserialize, Serialize};

use crate::app::ordering::SuffixOrder;
use crate::constants::{api, limits};

/// Configuration for a download run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Markers requested per page
    pub page_size: u32,
    /// Accession list downloads allowed before giving up
    pub max_accession_attempts: u32,
    /// RSID suffix tie-break used when sorting markers
    pub suffix_order: SuffixOrder,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            page_size: api::DEFAULT_PAGE_SIZE,
            max_accession_attempts: limits::MAX_ACCESSION_DOWNLOAD_ATTEMPTS,
            suffix_order: SuffixOrder::default(),
        }
    }
}

impl OrchestratorConfig {
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_max_accession_attempts(mut self, attempts: u32) -> Self {
        self.max_accession_attempts = attempts;
        self
    }

    pub fn with_suffix_order(mut self, suffix_order: SuffixOrder) -> Self {
        self.suffix_order = suffix_order;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.page_size == 0 {
            return Err("Page size cannot be zero".to_string());
        }

        if self.max_accession_attempts == 0 {
            return Err("Accession download attempts cannot be zero".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = OrchestratorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.page_size, 10_000);
        assert_eq!(config.max_accession_attempts, 5);
        assert_eq!(config.suffix_order, SuffixOrder::Descending);
    }

    #[test]
    fn test_config_builder_methods() {
        let config = OrchestratorConfig::default()
            .with_page_size(500)
            .with_max_accession_attempts(2)
            .with_suffix_order(SuffixOrder::Ascending);

        assert_eq!(config.page_size, 500);
        assert_eq!(config.max_accession_attempts, 2);
        assert_eq!(config.suffix_order, SuffixOrder::Ascending);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let config = OrchestratorConfig::default().with_page_size(0);
        assert!(config.validate().is_err());

        let config = OrchestratorConfig::default().with_max_accession_attempts(0);
        assert!(config.validate().is_err());
    }
}
