//! Parsing context for HTML extraction
//!
//! Carries the URL a document was fetched from so relative links resolve
//! against the right page.

use url::Url;

/// Context for a catalogue listing page
#[derive(Debug, Clone)]
pub struct ParseContext {
    /// Listing page being parsed
    pub page_url: Url,

    /// Site root; product links must share its host
    pub base_url: Url,

    /// 1-based visit number within the discovery run
    pub page_number: u32,
}

impl ParseContext {
    pub const fn new(page_url: Url, base_url: Url, page_number: u32) -> Self {
        Self {
            page_url,
            base_url,
            page_number,
        }
    }
}

/// Context for a product detail page
#[derive(Debug, Clone)]
pub struct DetailParseContext {
    /// Product URL being parsed, written to the record as-is
    pub url: String,

    /// Constant origin identifier for the record
    pub source: String,
}

impl DetailParseContext {
    pub fn new(url: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            source: source.into(),
        }
    }

    /// Parsed page URL, used to absolutize image links
    pub fn page_url(&self) -> Option<Url> {
        Url::parse(&self.url).ok()
    }
}
