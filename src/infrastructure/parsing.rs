//! HTML parsing infrastructure
//!
//! Trait-based parsers for WooCommerce listing and product pages, with
//! selector fallbacks and the attribute/price helpers they share.

pub mod attribute_extractor;
pub mod config;
pub mod context;
pub mod error;
pub mod price;
pub mod product_detail_parser;
pub mod product_list_parser;

// Re-export public types
pub use attribute_extractor::{AttributeExtractor, normalize_label};
pub use config::{ListingSelectors, ProductPageSelectors};
pub use context::{DetailParseContext, ParseContext};
pub use error::{ParsingError, ParsingResult};
pub use price::parse_price;
pub use product_detail_parser::ProductDetailParser;
pub use product_list_parser::{ListingLinks, PRODUCT_PATH_PATTERN, ProductListParser};

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

/// Parser trait with context support
pub trait ContextualParser {
    type Output;
    type Context;

    /// Parse a document with contextual information
    fn parse_with_context(&self, html: &Html, context: &Self::Context) -> ParsingResult<Self::Output>;
}

/// Compile selector strings into Selector objects.
///
/// Bad selectors are logged and skipped; a group with no valid selector is an error.
pub fn compile_selectors(group: &str, selector_strings: &[String]) -> ParsingResult<Vec<Selector>> {
    let mut selectors = Vec::new();
    let mut errors = Vec::new();

    for selector_str in selector_strings {
        match Selector::parse(selector_str) {
            Ok(selector) => selectors.push(selector),
            Err(e) => {
                warn!("Failed to compile selector '{}': {}", selector_str, e);
                errors.push(format!("'{selector_str}': {e}"));
            }
        }
    }

    if selectors.is_empty() {
        return Err(ParsingError::NoValidSelectors {
            group: group.to_string(),
            errors: errors.join(", "),
        });
    }

    if !errors.is_empty() {
        debug!("Some '{}' selectors failed to compile: {}", group, errors.join(", "));
    }

    Ok(selectors)
}

/// Text nodes trimmed and concatenated with no separator
pub fn element_text(element: &ElementRef<'_>) -> String {
    element.text().map(str::trim).filter(|t| !t.is_empty()).collect()
}

/// Text nodes trimmed and joined with single spaces
pub fn element_text_spaced(element: &ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Collapse runs of whitespace to a single space and trim
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First element matched by the first selector that matches anything
pub fn select_first<'a>(root: ElementRef<'a>, selectors: &[Selector]) -> Option<ElementRef<'a>> {
    selectors.iter().find_map(|selector| root.select(selector).next())
}

/// All elements of the first selector that matches anything
pub fn select_from_multiple<'a>(root: ElementRef<'a>, selectors: &[Selector]) -> Vec<ElementRef<'a>> {
    for selector in selectors {
        let elements: Vec<_> = root.select(selector).collect();
        if !elements.is_empty() {
            return elements;
        }
    }
    Vec::new()
}
