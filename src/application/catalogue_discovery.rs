//! Catalogue discovery
//!
//! Breadth-first walk over listing pages (pagination and category links),
//! collecting every product URL seen, bounded by a page-visit budget.

use std::collections::{BTreeSet, HashSet, VecDeque};
use std::time::Duration;

use tracing::{debug, info, warn};
use url::Url;

use crate::infrastructure::parsing::{ParseContext, ProductListParser};
use crate::infrastructure::{PageFetcher, RobotsGate};

/// Result of one discovery pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveryOutcome {
    /// Unique product URLs, sorted
    pub product_urls: Vec<String>,
    /// Listing pages counted against the budget, failed fetches included
    pub pages_visited: u32,
    pub failed_fetches: usize,
}

pub struct CatalogueDiscoverer<'a> {
    fetcher: &'a dyn PageFetcher,
    robots: &'a RobotsGate,
    parser: &'a ProductListParser,
    base_url: Url,
    max_pages: u32,
    delay: Duration,
}

impl<'a> CatalogueDiscoverer<'a> {
    pub fn new(
        fetcher: &'a dyn PageFetcher,
        robots: &'a RobotsGate,
        parser: &'a ProductListParser,
        base_url: Url,
        max_pages: u32,
        delay: Duration,
    ) -> Self {
        Self {
            fetcher,
            robots,
            parser,
            base_url,
            max_pages,
            delay,
        }
    }

    /// Entry URLs built from site-relative paths, keeping only those robots.txt allows
    pub fn entry_points(&self, paths: &[String]) -> Vec<String> {
        paths
            .iter()
            .filter_map(|path| match self.base_url.join(path) {
                Ok(url) => Some(url.to_string()),
                Err(e) => {
                    warn!("Ignoring entry path '{}': {}", path, e);
                    None
                }
            })
            .filter(|url| {
                let allowed = self.robots.can_fetch(url);
                if !allowed {
                    debug!("Entry point {} disallowed by robots.txt", url);
                }
                allowed
            })
            .collect()
    }

    /// Walk the catalogue starting from `entry_paths`
    pub async fn discover(&self, entry_paths: &[String]) -> DiscoveryOutcome {
        let mut queue: VecDeque<String> = self.entry_points(entry_paths).into();
        let mut visited: HashSet<String> = HashSet::new();
        let mut product_urls: BTreeSet<String> = BTreeSet::new();
        let mut outcome = DiscoveryOutcome::default();

        while outcome.pages_visited < self.max_pages {
            let Some(page_url) = queue.pop_front() else {
                break;
            };
            if !visited.insert(page_url.clone()) {
                continue;
            }
            outcome.pages_visited += 1;

            info!("📄 Crawling catalogue page {}: {}", outcome.pages_visited, page_url);

            let body = match self.fetcher.fetch_html(&page_url).await {
                Ok(body) => body,
                Err(e) => {
                    warn!("⚠️ Skipping listing page {}: {}", page_url, e);
                    outcome.failed_fetches += 1;
                    tokio::time::sleep(self.delay).await;
                    continue;
                }
            };

            let links = Url::parse(&page_url)
                .map_err(|e| e.to_string())
                .and_then(|url| {
                    let context = ParseContext::new(url, self.base_url.clone(), outcome.pages_visited);
                    self.parser.parse_page(&body, &context).map_err(|e| e.to_string())
                });

            match links {
                Ok(links) => {
                    product_urls.extend(links.product_urls.iter().cloned());
                    for target in links.listing_targets() {
                        if !visited.contains(target) && self.robots.can_fetch(target) {
                            queue.push_back(target.clone());
                        }
                    }
                }
                Err(e) => warn!("⚠️ Could not parse listing page {}: {}", page_url, e),
            }

            tokio::time::sleep(self.delay).await;
        }

        if !queue.is_empty() {
            info!("Page budget of {} reached with {} page(s) still queued", self.max_pages, queue.len());
        }

        outcome.product_urls = product_urls.into_iter().collect();
        outcome
    }
}
