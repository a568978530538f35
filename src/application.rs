//! Application layer module
//!
//! Use cases that orchestrate fetching, parsing and persistence.

pub mod catalogue_discovery;
pub mod enrichment;
pub mod scrape_use_case;

pub use catalogue_discovery::{CatalogueDiscoverer, DiscoveryOutcome};
pub use enrichment::{Enricher, EnrichmentReport};
pub use scrape_use_case::{ScrapeReport, ScrapeUseCase, target_host};
