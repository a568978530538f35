//! Run-level error taxonomy
//!
//! Every variant aborts a run. Fetch and parsing failures for a single page
//! never reach this type; the use cases log them and skip the page.

use std::path::PathBuf;

use thiserror::Error;

use crate::infrastructure::config::ConfigError;

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("robots.txt disallows crawling {url}")]
    CrawlingDisallowed { url: String },

    #[error("Input file not found: {}", path.display())]
    InputMissing { path: PathBuf },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ScraperError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type ScraperResult<T> = Result<T, ScraperError>;
