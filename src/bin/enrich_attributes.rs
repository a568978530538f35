//! Attribute enrichment
//!
//! Reads `products.json` from the output directory, re-fetches each product
//! page and rewrites the file with a fresh `attributes` map per record.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info};

use wc_catalogue_scraper_lib::ScraperError;
use wc_catalogue_scraper_lib::application::Enricher;
use wc_catalogue_scraper_lib::infrastructure::{HttpClient, HttpClientConfig, ScraperConfig, init_logging};

#[tokio::main]
async fn main() -> Result<()> {
    let config = ScraperConfig::load_for_enrichment().context("failed to load scraper configuration")?;
    init_logging(&config.logging, &config.output_dir)?;

    info!("{}", "=".repeat(60));
    info!("🏷️ Attribute enrichment - {}", config.output_path().display());
    info!("{}", "=".repeat(60));

    let client = HttpClient::new(HttpClientConfig::from_scraper_config(&config))?;
    let enricher = Enricher::new(&config, Arc::new(client))?;

    match enricher.execute().await {
        Ok(report) => {
            info!("🎉 Done! Products enriched: {}/{}", report.enriched, report.total);
            Ok(())
        }
        Err(e @ ScraperError::InputMissing { .. }) => {
            error!("❌ {} - run the scraper first", e);
            Err(e.into())
        }
        Err(e) => {
            error!("❌ Aborting: {}", e);
            Err(e.into())
        }
    }
}
