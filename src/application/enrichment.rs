//! Attribute enrichment
//!
//! Re-reads a previous crawl's output, re-fetches every product page and
//! replaces only the `attributes` field of each record. Records are always
//! re-fetched, even when they already carry attributes.

use std::sync::Arc;
use std::time::Duration;

use scraper::Html;
use tracing::{info, warn};

use crate::domain::{Product, ProductAttributes};
use crate::error::{ScraperError, ScraperResult};
use crate::infrastructure::parsing::AttributeExtractor;
use crate::infrastructure::{AttributeStrategy, ConfigError, JsonProductStore, PageFetcher, ScraperConfig};

/// Counters for one enrichment pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichmentReport {
    pub total: usize,
    /// Records whose page was requested, whatever the outcome
    pub processed: usize,
    /// Records that ended with a non-empty attribute map
    pub enriched: usize,
    /// Records without a URL, left untouched
    pub skipped: usize,
}

pub struct Enricher {
    fetcher: Arc<dyn PageFetcher>,
    extractor: AttributeExtractor,
    store: JsonProductStore,
    delay: Duration,
}

impl Enricher {
    pub fn new(config: &ScraperConfig, fetcher: Arc<dyn PageFetcher>) -> ScraperResult<Self> {
        let extractor = AttributeExtractor::with_config(config.attribute_strategy, &config.product_selectors)
            .map_err(|e| ScraperError::Config(ConfigError::Validation { message: e.to_string() }))?;

        Ok(Self {
            fetcher,
            extractor,
            store: JsonProductStore::new(config.output_path()),
            delay: config.delay_duration(),
        })
    }

    pub const fn strategy(&self) -> AttributeStrategy {
        self.extractor.strategy()
    }

    /// Load the stored array, enrich it and write it back over the same file
    pub async fn execute(&self) -> ScraperResult<EnrichmentReport> {
        let mut products = self.store.load().await?;
        info!("🏷️ Attribute enrichment: {} products ({:?} strategy)", products.len(), self.strategy());

        let report = self.enrich_records(&mut products).await;

        info!("💾 Writing enriched data to {}", self.store.path().display());
        self.store.save(&products).await?;

        info!("Products enriched: {}/{}", report.enriched, report.total);
        info!("Skipped: {}", report.skipped);
        Ok(report)
    }

    /// Replace the attributes of every record that has a URL
    pub async fn enrich_records(&self, products: &mut [Product]) -> EnrichmentReport {
        let total = products.len();
        let mut report = EnrichmentReport {
            total,
            ..Default::default()
        };

        for (index, product) in products.iter_mut().enumerate() {
            if product.url.is_empty() {
                report.skipped += 1;
                continue;
            }

            info!("[{}/{}] {}", index + 1, total, product.url);
            let attributes = self.fetch_attributes(&product.url).await;
            report.processed += 1;

            if attributes.is_empty() {
                info!("– (no attributes found)");
            } else {
                info!("✅ {:?}", attributes);
                report.enriched += 1;
            }
            product.attributes = attributes;

            tokio::time::sleep(self.delay).await;
        }

        report
    }

    async fn fetch_attributes(&self, url: &str) -> ProductAttributes {
        match self.fetcher.fetch_html(url).await {
            Ok(body) => {
                let html = Html::parse_document(&body);
                self.extractor.extract(&html)
            }
            Err(e) => {
                warn!("⚠️ {}: {}", url, e);
                ProductAttributes::new()
            }
        }
    }
}
