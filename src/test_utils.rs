//! Test utilities
//!
//! An in-memory [`PageFetcher`] so discovery, extraction and enrichment can be
//! exercised against a fixed catalogue without network access.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::infrastructure::http_client::{FetchError, FetchResult, PageFetcher};

#[derive(Debug, Clone)]
enum StaticResponse {
    Page(String),
    Status(u16),
    Timeout,
}

/// URL → canned response table. Unknown URLs answer 404.
#[derive(Debug, Default)]
pub struct StaticPageFetcher {
    responses: HashMap<String, StaticResponse>,
    requests: Mutex<Vec<String>>,
}

impl StaticPageFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `html` with a 200 for `url`
    pub fn with_page(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.responses.insert(url.into(), StaticResponse::Page(html.into()));
        self
    }

    /// Answer `url` with a non-2xx status
    pub fn with_status(mut self, url: impl Into<String>, status: u16) -> Self {
        self.responses.insert(url.into(), StaticResponse::Status(status));
        self
    }

    /// Simulate a request timeout for `url`
    pub fn with_timeout(mut self, url: impl Into<String>) -> Self {
        self.responses.insert(url.into(), StaticResponse::Timeout);
        self
    }

    /// Every URL requested so far, in order
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().map(|log| log.clone()).unwrap_or_default()
    }

    /// How many times `url` was requested
    pub fn request_count(&self, url: &str) -> usize {
        self.requests().iter().filter(|u| u.as_str() == url).count()
    }
}

#[async_trait]
impl PageFetcher for StaticPageFetcher {
    async fn fetch_html(&self, url: &str) -> FetchResult<String> {
        if let Ok(mut log) = self.requests.lock() {
            log.push(url.to_string());
        }

        match self.responses.get(url) {
            Some(StaticResponse::Page(html)) => Ok(html.clone()),
            Some(StaticResponse::Status(status)) => Err(FetchError::HttpStatus {
                status: *status,
                url: url.to_string(),
            }),
            Some(StaticResponse::Timeout) => Err(FetchError::Timeout { url: url.to_string() }),
            None => Err(FetchError::HttpStatus {
                status: 404,
                url: url.to_string(),
            }),
        }
    }
}
