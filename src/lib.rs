//! WooCommerce catalogue scraper
//!
//! Discovers product pages on a single WooCommerce storefront, extracts
//! product records (prices, stock, images, attributes) and writes them as one
//! JSON array for downstream search indexing. A second entry point backfills
//! the attribute map of an existing output file.

// Module declarations
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod test_utils;

pub use error::{ScraperError, ScraperResult};
