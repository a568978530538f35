//! HTTP client for catalogue crawling
//!
//! One shared `reqwest::Client` (connection reuse) with the fixed crawler headers
//! and a per-request timeout. Failures come back as [`FetchError`] values so the
//! caller can skip the URL and keep going.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

use crate::infrastructure::config::ScraperConfig;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Request timed out: {url}")]
    Timeout { url: String },

    #[error("Transport error for {url}: {message}")]
    Transport { url: String, message: String },

    #[error("HTTP request failed with status {status}: {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Failed to read response body from {url}: {message}")]
    Body { url: String, message: String },

    #[error("Invalid URL: {url}")]
    InvalidUrl { url: String },
}

impl FetchError {
    /// HTTP status for status failures, `None` for transport-level failures
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type FetchResult<T> = Result<T, FetchError>;

/// Source of raw HTML pages.
///
/// Documents are parsed by the caller with `scraper::Html`, synchronously,
/// so no parsed tree is ever held across an await point.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// GET `url`; `Ok` only for a 2xx response
    async fn fetch_html(&self, url: &str) -> FetchResult<String>;
}

/// HTTP client configuration for crawling
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    pub user_agent: String,
    pub accept_language: String,
    pub accept: String,
    pub timeout: Duration,
    pub follow_redirects: bool,
}

impl HttpClientConfig {
    pub fn from_scraper_config(config: &ScraperConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            accept_language: config.accept_language.clone(),
            accept: config.accept.clone(),
            timeout: config.request_timeout(),
            follow_redirects: true,
        }
    }
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self::from_scraper_config(&ScraperConfig::default())
    }
}

/// reqwest-backed [`PageFetcher`]
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a new HTTP client with the given configuration
    pub fn new(config: HttpClientConfig) -> anyhow::Result<Self> {
        use anyhow::Context;

        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent).context("Invalid user agent")?,
        );
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_str(&config.accept_language).context("Invalid Accept-Language value")?,
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_str(&config.accept).context("Invalid Accept value")?,
        );

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .redirect(if config.follow_redirects {
                reqwest::redirect::Policy::limited(10)
            } else {
                reqwest::redirect::Policy::none()
            })
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    fn classify(url: &str, error: &reqwest::Error) -> FetchError {
        if error.is_timeout() {
            FetchError::Timeout { url: url.to_string() }
        } else if error.is_builder() {
            FetchError::InvalidUrl { url: url.to_string() }
        } else {
            FetchError::Transport {
                url: url.to_string(),
                message: error.to_string(),
            }
        }
    }
}

#[async_trait]
impl PageFetcher for HttpClient {
    async fn fetch_html(&self, url: &str) -> FetchResult<String> {
        info!("Fetching URL: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Self::classify(url, &e))?;

        let status: StatusCode = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let text = response.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout { url: url.to_string() }
            } else {
                FetchError::Body {
                    url: url.to_string(),
                    message: e.to_string(),
                }
            }
        })?;

        debug!("Successfully fetched: {} ({} chars, {})", url, text.len(), status);
        Ok(text)
    }
}
