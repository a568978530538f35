//! Configuration infrastructure
//!
//! Contains configuration loading for the catalogue scraper.
//!
//! Configuration is layered (lowest precedence first):
//! 1. Compiled defaults ([`ScraperConfig::default`])
//! 2. Optional `scraper.{toml,json,yaml}` file in the working directory
//! 3. `SCRAPER_*` environment variables (`SCRAPER_LOGGING__LEVEL` for nested keys)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::infrastructure::parsing::config::{ListingSelectors, ProductPageSelectors};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {source}")]
    Load {
        #[from]
        source: config::ConfigError,
    },

    #[error("Configuration validation failed: {message}")]
    Validation { message: String },
}

/// Which attribute sources the extractor consults
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeStrategy {
    /// Attribute list first, structured data only when the list yields nothing
    #[default]
    Dual,
    /// Structured data (JSON-LD `additionalProperty`) only
    StructuredDataOnly,
}

/// Complete scraper configuration, built once and passed by reference
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Site root; only links on this host are followed
    pub base_url: String,

    /// Directory that receives `products.json`
    pub output_dir: PathBuf,

    /// File name of the product array inside `output_dir`
    pub output_file: String,

    /// Pause after every network call, in seconds (fractional allowed)
    pub delay: f64,

    /// Listing-page visit budget for catalogue discovery
    pub max_pages: u32,

    /// Per-request timeout in seconds
    pub request_timeout_seconds: u64,

    /// Full User-Agent header value
    pub user_agent: String,

    /// Product token matched against robots.txt groups
    pub robots_agent: String,

    pub accept_language: String,
    pub accept: String,

    /// Candidate listing paths seeded into discovery
    pub entry_paths: Vec<String>,

    /// Constant written to every record's `source` field
    pub source: String,

    pub attribute_strategy: AttributeStrategy,

    pub logging: LoggingConfig,

    pub listing_selectors: ListingSelectors,
    pub product_selectors: ProductPageSelectors,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// Enable JSON formatted file logs
    pub json_format: bool,

    /// Enable console output
    pub console_output: bool,

    /// Enable file output (`<output_dir>/logs/scraper.log`)
    pub file_output: bool,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::BASE_URL.to_string(),
            output_dir: PathBuf::from(defaults::OUTPUT_DIR),
            output_file: defaults::OUTPUT_FILE.to_string(),
            delay: defaults::DELAY_SECONDS,
            max_pages: defaults::MAX_PAGES,
            request_timeout_seconds: defaults::REQUEST_TIMEOUT_SECONDS,
            user_agent: defaults::USER_AGENT.to_string(),
            robots_agent: defaults::ROBOTS_AGENT.to_string(),
            accept_language: defaults::ACCEPT_LANGUAGE.to_string(),
            accept: defaults::ACCEPT.to_string(),
            entry_paths: defaults::ENTRY_PATHS.iter().map(|s| s.to_string()).collect(),
            source: defaults::SOURCE.to_string(),
            attribute_strategy: AttributeStrategy::default(),
            logging: LoggingConfig::default(),
            listing_selectors: ListingSelectors::default(),
            product_selectors: ProductPageSelectors::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            json_format: false,
            console_output: true,
            file_output: false,
        }
    }
}

impl ScraperConfig {
    /// Load configuration for a full catalogue crawl
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_defaults(Self::default())
    }

    /// Load configuration for the attribute enricher, which paces itself
    /// slightly faster unless `SCRAPER_DELAY` says otherwise
    pub fn load_for_enrichment() -> Result<Self, ConfigError> {
        Self::load_with_defaults(Self {
            delay: defaults::ENRICH_DELAY_SECONDS,
            ..Self::default()
        })
    }

    fn load_with_defaults(defaults: Self) -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&defaults)?)
            .add_source(config::File::with_name("scraper").required(false))
            .add_source(
                config::Environment::with_prefix("SCRAPER")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the crawl cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.delay.is_finite() || self.delay < 0.0 {
            return Err(ConfigError::Validation {
                message: format!("delay must be a non-negative number of seconds, got {}", self.delay),
            });
        }

        if self.delay > defaults::MAX_DELAY_SECONDS {
            return Err(ConfigError::Validation {
                message: format!(
                    "delay must be at most {} seconds, got {}",
                    defaults::MAX_DELAY_SECONDS,
                    self.delay
                ),
            });
        }

        if self.request_timeout_seconds == 0 {
            return Err(ConfigError::Validation {
                message: "request_timeout_seconds must be greater than 0".to_string(),
            });
        }

        if self.max_pages == 0 {
            return Err(ConfigError::Validation {
                message: "max_pages must be greater than 0".to_string(),
            });
        }

        let base = Url::parse(&self.base_url).map_err(|e| ConfigError::Validation {
            message: format!("base_url '{}' is not a valid URL: {}", self.base_url, e),
        })?;
        if base.host_str().is_none() {
            return Err(ConfigError::Validation {
                message: format!("base_url '{}' has no host", self.base_url),
            });
        }

        Ok(())
    }

    /// Parsed site root. Validated at load time.
    pub fn base(&self) -> Result<Url, url::ParseError> {
        Url::parse(&self.base_url)
    }

    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(&self.output_file)
    }

    /// Pause between requests; out-of-range values are clamped, NaN means no pause
    pub fn delay_duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.delay.clamp(0.0, defaults::MAX_DELAY_SECONDS)).unwrap_or_default()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

/// Default configuration values
pub mod defaults {
    /// Catalogue site root
    pub const BASE_URL: &str = "https://panuts.com";

    /// Default output directory (container volume)
    pub const OUTPUT_DIR: &str = "/output";

    pub const OUTPUT_FILE: &str = "products.json";

    /// Default delay between requests for a crawl, in seconds
    pub const DELAY_SECONDS: f64 = 1.5;

    /// Default delay between requests for attribute enrichment, in seconds
    pub const ENRICH_DELAY_SECONDS: f64 = 1.0;

    /// Upper bound accepted for either delay
    pub const MAX_DELAY_SECONDS: f64 = 3600.0;

    /// Default maximum catalogue pages to visit
    pub const MAX_PAGES: u32 = 20;

    pub const REQUEST_TIMEOUT_SECONDS: u64 = 15;

    pub const USER_AGENT: &str =
        "Mozilla/5.0 (compatible; WCMeilisearchBot/1.0; +https://github.com/local/wc-meilisearch)";

    pub const ROBOTS_AGENT: &str = "WCMeilisearchBot";

    pub const ACCEPT_LANGUAGE: &str = "es-CO,es;q=0.9,en;q=0.8";

    pub const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

    /// Listing pages tried first, in order
    pub const ENTRY_PATHS: &[&str] = &["/tienda/", "/shop/", "/productos/", "/"];

    pub const SOURCE: &str = "panuts.com";

    pub const LOG_LEVEL: &str = "info";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ScraperConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.output_path(), PathBuf::from("/output/products.json"));
        assert_eq!(config.request_timeout(), Duration::from_secs(15));
    }

    #[test]
    fn test_negative_delay_is_rejected() {
        let config = ScraperConfig {
            delay: -1.0,
            ..ScraperConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Validation { .. })));
    }

    #[test]
    fn test_zero_page_budget_is_rejected() {
        let config = ScraperConfig {
            max_pages: 0,
            ..ScraperConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_fractional_delay_duration() {
        let config = ScraperConfig {
            delay: 0.25,
            ..ScraperConfig::default()
        };
        assert_eq!(config.delay_duration(), Duration::from_millis(250));
    }

    #[test]
    fn test_oversized_delay_is_rejected_and_clamped() {
        let config = ScraperConfig {
            delay: 1e30,
            ..ScraperConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Validation { .. })));
        assert_eq!(config.delay_duration(), Duration::from_secs(3600));

        let unset = ScraperConfig {
            delay: f64::NAN,
            ..ScraperConfig::default()
        };
        assert_eq!(unset.delay_duration(), Duration::ZERO);
    }

    #[test]
    fn test_attribute_strategy_wire_names() {
        let strategy: AttributeStrategy = serde_json::from_str("\"structured_data_only\"").unwrap();
        assert_eq!(strategy, AttributeStrategy::StructuredDataOnly);
    }
}
