//! Infrastructure layer: configuration, logging, HTTP, robots.txt, HTML parsing
//! and JSON persistence.

pub mod config;
pub mod http_client;
pub mod json_store;
pub mod logging;
pub mod parsing;
pub mod robots;

// Re-export commonly used items
pub use config::{AttributeStrategy, ConfigError, LoggingConfig, ScraperConfig};
pub use http_client::{FetchError, FetchResult, HttpClient, HttpClientConfig, PageFetcher};
pub use json_store::JsonProductStore;
pub use logging::{get_log_directory, init_logging};
pub use parsing::{
    AttributeExtractor, ContextualParser, ParsingError, ParsingResult, ProductDetailParser, ProductListParser,
};
pub use robots::{RobotsGate, RobotsPolicy};
