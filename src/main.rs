//! Full catalogue crawl: discover product pages, extract records, write JSON.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info};

use wc_catalogue_scraper_lib::application::{ScrapeUseCase, target_host};
use wc_catalogue_scraper_lib::infrastructure::logging::log_system_info;
use wc_catalogue_scraper_lib::infrastructure::{HttpClient, HttpClientConfig, ScraperConfig, init_logging};

#[tokio::main]
async fn main() -> Result<()> {
    let config = ScraperConfig::load().context("failed to load scraper configuration")?;
    init_logging(&config.logging, &config.output_dir)?;

    info!("{}", "=".repeat(60));
    info!("🚀 {} scraper - WC Meilisearch", target_host(&config).unwrap_or_default());
    info!("{}", "=".repeat(60));
    info!("Base URL   : {}", config.base_url);
    info!("Output     : {}", config.output_path().display());
    info!("Delay      : {}s between requests", config.delay);
    info!("Max pages  : {}", config.max_pages);
    log_system_info();

    let client = HttpClient::new(HttpClientConfig::from_scraper_config(&config))?;
    let use_case = ScrapeUseCase::new(config, Arc::new(client));

    match use_case.execute().await {
        Ok(report) => {
            info!("🎉 Done!");
            info!("Listing pages visited : {}", report.listing_pages_visited);
            info!("Product URLs found    : {}", report.product_urls_discovered);
            info!("Products scraped      : {}", report.records_written);
            info!("Discarded (no name)   : {}", report.records_discarded);
            info!("Skipped (robots.txt)  : {}", report.skipped_by_robots);
            info!("Fetch failures        : {}", report.fetch_failures);
            info!("Output file           : {}", report.output_path.display());
            Ok(())
        }
        Err(e) => {
            error!("❌ Aborting: {}", e);
            Err(e.into())
        }
    }
}
