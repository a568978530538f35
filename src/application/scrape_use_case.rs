//! Full catalogue crawl
//!
//! robots.txt → discovery → product extraction → JSON output, strictly one
//! request at a time with a fixed pause after each one.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};
use url::Url;

use super::catalogue_discovery::CatalogueDiscoverer;
use crate::domain::Product;
use crate::error::{ScraperError, ScraperResult};
use crate::infrastructure::parsing::{DetailParseContext, ProductDetailParser, ProductListParser};
use crate::infrastructure::{ConfigError, JsonProductStore, PageFetcher, ParsingError, RobotsGate, ScraperConfig};

/// Counters for one crawl
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrapeReport {
    pub listing_pages_visited: u32,
    pub product_urls_discovered: usize,
    pub records_written: usize,
    /// Product pages without a resolvable name
    pub records_discarded: usize,
    pub skipped_by_robots: usize,
    /// Listing and product fetches that failed
    pub fetch_failures: usize,
    pub output_path: PathBuf,
}

pub struct ScrapeUseCase {
    config: ScraperConfig,
    fetcher: Arc<dyn PageFetcher>,
    store: JsonProductStore,
}

impl ScrapeUseCase {
    pub fn new(config: ScraperConfig, fetcher: Arc<dyn PageFetcher>) -> Self {
        let store = JsonProductStore::new(config.output_path());
        Self { config, fetcher, store }
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    /// Run the crawl. Only configuration, robots.txt and output errors abort it.
    pub async fn execute(&self) -> ScraperResult<ScrapeReport> {
        let base = self.config.base().map_err(|e| {
            ScraperError::Config(ConfigError::Validation {
                message: format!("base_url '{}': {}", self.config.base_url, e),
            })
        })?;
        let list_parser = ProductListParser::with_config(&self.config.listing_selectors).map_err(selector_error)?;
        let detail_parser = ProductDetailParser::with_config(&self.config.product_selectors, self.config.attribute_strategy)
            .map_err(selector_error)?;

        let robots = RobotsGate::load(self.fetcher.as_ref(), &base, &self.config.robots_agent).await;
        if !robots.allows_site_root(&base) {
            return Err(ScraperError::CrawlingDisallowed { url: base.to_string() });
        }

        let mut report = ScrapeReport {
            output_path: self.store.path().to_path_buf(),
            ..Default::default()
        };

        info!("🔍 Phase 1: Discovering product URLs");
        let discoverer = CatalogueDiscoverer::new(
            self.fetcher.as_ref(),
            &robots,
            &list_parser,
            base,
            self.config.max_pages,
            self.config.delay_duration(),
        );
        let discovery = discoverer.discover(&self.config.entry_paths).await;
        report.listing_pages_visited = discovery.pages_visited;
        report.product_urls_discovered = discovery.product_urls.len();
        report.fetch_failures = discovery.failed_fetches;
        info!("Found {} unique product URL(s)", discovery.product_urls.len());

        if discovery.product_urls.is_empty() {
            warn!("⚠️ No products found. Saving empty list.");
            self.store.save(&[]).await?;
            return Ok(report);
        }

        info!("📦 Phase 2: Scraping product pages");
        let products = self
            .scrape_products(&discovery.product_urls, &robots, &detail_parser, &mut report)
            .await;

        info!("💾 Phase 3: Writing {} product(s) to {}", products.len(), self.store.path().display());
        self.store.save(&products).await?;
        report.records_written = products.len();

        Ok(report)
    }

    async fn scrape_products(
        &self,
        urls: &[String],
        robots: &RobotsGate,
        parser: &ProductDetailParser,
        report: &mut ScrapeReport,
    ) -> Vec<Product> {
        let total = urls.len();
        let mut products = Vec::with_capacity(total);

        for (index, url) in urls.iter().enumerate() {
            let position = index + 1;
            if !robots.can_fetch(url) {
                info!("[{}/{}] Skipped (robots.txt): {}", position, total, url);
                report.skipped_by_robots += 1;
                continue;
            }

            info!("[{}/{}] {}", position, total, url);
            match self.fetcher.fetch_html(url).await {
                Ok(body) => {
                    let context = DetailParseContext::new(url.as_str(), self.config.source.as_str());
                    match parser.parse_page(&body, &context) {
                        Ok(product) => {
                            info!("✅ {} | {} | {}", product.name, product.price, product.stock_status);
                            products.push(product);
                        }
                        Err(e) => {
                            warn!("❌ Could not parse product {}: {}", url, e);
                            report.records_discarded += 1;
                        }
                    }
                }
                Err(e) => {
                    warn!("⚠️ Skipping product page {}: {}", url, e);
                    report.fetch_failures += 1;
                }
            }

            tokio::time::sleep(self.config.delay_duration()).await;
        }

        products
    }
}

fn selector_error(e: ParsingError) -> ScraperError {
    ScraperError::Config(ConfigError::Validation { message: e.to_string() })
}

/// Host the crawl targets, for banners
pub fn target_host(config: &ScraperConfig) -> Option<String> {
    Url::parse(&config.base_url)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::StaticPageFetcher;
    use tempfile::TempDir;

    fn config_in(dir: &TempDir) -> ScraperConfig {
        ScraperConfig {
            output_dir: dir.path().to_path_buf(),
            delay: 0.0,
            entry_paths: vec!["/tienda/".to_string()],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_disallowed_root_aborts_without_output() {
        let dir = TempDir::new().unwrap();
        let fetcher = Arc::new(
            StaticPageFetcher::new().with_page("https://panuts.com/robots.txt", "User-agent: *\nDisallow: /\n"),
        );
        let use_case = ScrapeUseCase::new(config_in(&dir), fetcher.clone());

        let err = use_case.execute().await.unwrap_err();

        assert!(matches!(err, ScraperError::CrawlingDisallowed { .. }));
        assert!(!use_case.config().output_path().exists());
        assert_eq!(fetcher.requests(), vec!["https://panuts.com/robots.txt"]);
    }

    #[tokio::test]
    async fn test_forbidden_robots_disallows_everything() {
        let dir = TempDir::new().unwrap();
        let fetcher = Arc::new(StaticPageFetcher::new().with_status("https://panuts.com/robots.txt", 403));
        let use_case = ScrapeUseCase::new(config_in(&dir), fetcher);

        let err = use_case.execute().await.unwrap_err();
        assert!(matches!(err, ScraperError::CrawlingDisallowed { .. }));
    }

    #[tokio::test]
    async fn test_no_products_writes_empty_array() {
        let dir = TempDir::new().unwrap();
        let fetcher = Arc::new(StaticPageFetcher::new().with_page("https://panuts.com/tienda/", "<p>vacío</p>"));
        let use_case = ScrapeUseCase::new(config_in(&dir), fetcher);

        let report = use_case.execute().await.unwrap();

        assert_eq!(report.listing_pages_visited, 1);
        assert_eq!(report.records_written, 0);
        let raw = std::fs::read_to_string(use_case.config().output_path()).unwrap();
        assert_eq!(raw.trim(), "[]");
    }

    #[tokio::test]
    async fn test_product_disallowed_by_robots_is_skipped() {
        let dir = TempDir::new().unwrap();
        let fetcher = Arc::new(
            StaticPageFetcher::new()
                .with_page("https://panuts.com/robots.txt", "User-agent: *\nDisallow: /producto/oculto/\n")
                .with_page(
                    "https://panuts.com/tienda/",
                    r#"<a href="/producto/oculto/">x</a><a href="/producto/visible/">y</a>"#,
                )
                .with_page("https://panuts.com/producto/visible/", "<h1>Visible</h1>"),
        );
        let use_case = ScrapeUseCase::new(config_in(&dir), fetcher.clone());

        let report = use_case.execute().await.unwrap();

        assert_eq!(report.product_urls_discovered, 2);
        assert_eq!(report.skipped_by_robots, 1);
        assert_eq!(report.records_written, 1);
        assert_eq!(fetcher.request_count("https://panuts.com/producto/oculto/"), 0);
    }

    #[test]
    fn test_target_host() {
        assert_eq!(target_host(&ScraperConfig::default()).as_deref(), Some("panuts.com"));
    }
}
