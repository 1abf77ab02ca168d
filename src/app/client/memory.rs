//! In-memory transport serving canned responses
//!
//! Used to replay recorded API responses without network access, and by the
//! test suites to script upstream behaviour (failures, changing payloads)
//! while counting the requests that actually reach the "network".

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use url::Url;

use crate::errors::{DownloadError, DownloadResult};

use super::http::ApiTransport;

/// A scripted response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CannedResponse {
    /// 200 with the given body
    Body(Vec<u8>),
    /// Non-success status with no body
    Status(u16),
}

impl CannedResponse {
    pub fn json(value: &serde_json::Value) -> Self {
        Self::Body(value.to_string().into_bytes())
    }
}

#[derive(Debug, Default)]
struct Route {
    /// Served front to back; the last one repeats once the queue drains
    responses: VecDeque<CannedResponse>,
}

/// Transport answering from a URL → response table
#[derive(Debug, Default)]
pub struct MemoryTransport {
    routes: Mutex<HashMap<String, Route>>,
    requests: Mutex<Vec<String>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for `url`
    ///
    /// Multiple responses for one URL are served in order, and the final one
    /// keeps being served after that.
    pub fn respond(&self, url: &str, response: CannedResponse) -> &Self {
        let mut routes = self.routes.lock().unwrap_or_else(|e| e.into_inner());
        routes
            .entry(url.to_string())
            .or_default()
            .responses
            .push_back(response);
        self
    }

    /// Every URL requested so far, in order
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Number of requests made for URLs starting with `prefix`
    pub fn request_count_matching(&self, prefix: &str) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|url| url.starts_with(prefix))
            .count()
    }
}

#[async_trait]
impl ApiTransport for MemoryTransport {
    async fn get(&self, url: &Url) -> DownloadResult<Vec<u8>> {
        let key = url.to_string();
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(key.clone());

        let response = {
            let mut routes = self.routes.lock().unwrap_or_else(|e| e.into_inner());
            routes.get_mut(&key).and_then(|route| {
                if route.responses.len() > 1 {
                    route.responses.pop_front()
                } else {
                    route.responses.front().cloned()
                }
            })
        };

        match response {
            Some(CannedResponse::Body(body)) => Ok(body),
            Some(CannedResponse::Status(status)) => Err(DownloadError::RequestFailed {
                status,
                url: key,
            }),
            None => Err(DownloadError::RequestFailed {
                status: 404,
                url: key,
            }),
        }
    }
}
