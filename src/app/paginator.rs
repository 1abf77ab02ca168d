//! Exhaustive pagination of an accession's markers
//!
//! The marker endpoint returns pages linked through `links.next`. The link is
//! only known once the previous page has arrived, so pages are fetched
//! strictly one after another; concurrency happens across accessions, never
//! within one. A `next` link that points back at an already fetched page
//! aborts the accession instead of cycling forever.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::app::client::ApiClient;
use crate::app::models::{Accession, Marker};
use crate::constants::api;
use crate::errors::{DownloadError, DownloadResult};

/// Follows the page chain for one accession
#[derive(Debug, Clone)]
pub struct MarkerPaginator {
    client: Arc<ApiClient>,
    page_size: u32,
}

impl MarkerPaginator {
    pub fn new(client: Arc<ApiClient>, page_size: u32) -> Self {
        Self { client, page_size }
    }

    pub fn with_default_page_size(client: Arc<ApiClient>) -> Self {
        Self::new(client, api::DEFAULT_PAGE_SIZE)
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Download every marker of an accession in API order
    ///
    /// The result is the concatenation of all pages, each page's records in
    /// the order returned. Nothing is sorted or de-duplicated.
    ///
    /// # Errors
    ///
    /// Any failed page fails the whole accession; a non-success status
    /// surfaces as `DownloadError::RequestFailed` and is not retried here.
    /// A repeated page URL surfaces as `DownloadError::PaginationLoop`.
    pub async fn fetch_all(&self, accession: &Accession) -> DownloadResult<Vec<Marker>> {
        let mut url = self.client.markers_url(&accession.id, self.page_size)?;
        let mut visited = HashSet::new();
        let mut markers = Vec::new();
        let mut pages = 0usize;

        loop {
            if !visited.insert(url.clone()) {
                warn!(
                    "Page {} for chromosome {} was already fetched",
                    url, accession.chromosome
                );
                return Err(DownloadError::PaginationLoop {
                    url: url.to_string(),
                });
            }

            let page = self.client.fetch_page::<Marker>(&url).await?;
            pages += 1;
            debug!(
                "Downloaded {} markers for chromosome {} (page {})",
                page.data.len(),
                accession.chromosome,
                pages
            );
            markers.extend(page.data);

            match page.links.next {
                Some(next) => url = self.client.resolve(&next)?,
                None => break,
            }
        }

        info!(
            "Downloaded {} markers for chromosome {} in {} pages",
            markers.len(),
            accession.chromosome,
            pages
        );
        Ok(markers)
    }
}
