//! Catalogue listing parser
//!
//! Collects, from one listing page, the product links it exposes and the
//! further listing pages (pagination, categories) worth visiting.

use regex::Regex;
use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

use super::config::ListingSelectors;
use super::context::ParseContext;
use super::{ContextualParser, ParsingError, ParsingResult, compile_selectors};

/// `producto` or `product` segment followed by exactly one slug segment
pub const PRODUCT_PATH_PATTERN: &str = r"/(producto|product)/[^/]+/?$";

/// Links found on one listing page, in document order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingLinks {
    pub product_urls: Vec<String>,
    pub next_pages: Vec<String>,
    pub category_pages: Vec<String>,
}

impl ListingLinks {
    /// Pagination targets first, then category targets
    pub fn listing_targets(&self) -> impl Iterator<Item = &String> {
        self.next_pages.iter().chain(self.category_pages.iter())
    }
}

/// Parser for catalogue listing pages
pub struct ProductListParser {
    product_path: Regex,
    anchor_selectors: Vec<Selector>,
    next_page_selectors: Vec<Selector>,
    category_selectors: Vec<Selector>,
}

impl ProductListParser {
    /// Create a new listing parser with default WooCommerce selectors
    pub fn new() -> ParsingResult<Self> {
        Self::with_config(&ListingSelectors::default())
    }

    /// Create parser with custom selector configuration
    pub fn with_config(selectors: &ListingSelectors) -> ParsingResult<Self> {
        let product_path = Regex::new(PRODUCT_PATH_PATTERN).map_err(|e| ParsingError::InvalidPattern {
            pattern: PRODUCT_PATH_PATTERN.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            product_path,
            anchor_selectors: compile_selectors("anchor", &selectors.anchor)?,
            next_page_selectors: compile_selectors("next_page", &selectors.next_page)?,
            category_selectors: compile_selectors("category", &selectors.category)?,
        })
    }

    /// True if a URL path points at a single product page
    pub fn is_product_path(&self, path: &str) -> bool {
        self.product_path.is_match(path)
    }

    /// Parse raw page text; the document never outlives this call
    pub fn parse_page(&self, body: &str, context: &ParseContext) -> ParsingResult<ListingLinks> {
        let html = Html::parse_document(body);
        self.parse_with_context(&html, context)
    }

    /// Resolve an anchor target against the page it appeared on
    fn resolve_url(&self, href: &str, page_url: &Url) -> ParsingResult<Url> {
        page_url.join(href.trim()).map_err(|e| ParsingError::UrlResolutionFailed {
            url: href.to_string(),
            reason: e.to_string(),
        })
    }

    /// Absolute same-host targets of every anchor matched by `selectors`
    fn collect_links(&self, html: &Html, selectors: &[Selector], context: &ParseContext) -> Vec<Url> {
        let mut links = Vec::new();

        for selector in selectors {
            for element in html.select(selector) {
                let Some(href) = element.value().attr("href").filter(|h| !h.trim().is_empty()) else {
                    continue;
                };

                match self.resolve_url(href, &context.page_url) {
                    Ok(url) if same_host(&url, &context.base_url) && !links.contains(&url) => links.push(url),
                    Ok(_) => {}
                    Err(e) => debug!("Ignoring link on page {}: {}", context.page_number, e),
                }
            }
        }

        links
    }
}

fn same_host(url: &Url, base: &Url) -> bool {
    url.host_str() == base.host_str()
}

impl ContextualParser for ProductListParser {
    type Output = ListingLinks;
    type Context = ParseContext;

    fn parse_with_context(&self, html: &Html, context: &Self::Context) -> ParsingResult<Self::Output> {
        let product_urls = self
            .collect_links(html, &self.anchor_selectors, context)
            .into_iter()
            .filter(|url| self.is_product_path(url.path()))
            .map(String::from)
            .collect::<Vec<_>>();

        let next_pages = self
            .collect_links(html, &self.next_page_selectors, context)
            .into_iter()
            .map(String::from)
            .collect::<Vec<_>>();

        let category_pages = self
            .collect_links(html, &self.category_selectors, context)
            .into_iter()
            .map(String::from)
            .collect::<Vec<_>>();

        debug!(
            "Listing page {} ({}): {} product links, {} next, {} categories",
            context.page_number,
            context.page_url,
            product_urls.len(),
            next_pages.len(),
            category_pages.len()
        );

        Ok(ListingLinks {
            product_urls,
            next_pages,
            category_pages,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn context(page: &str) -> ParseContext {
        ParseContext::new(
            Url::parse(page).unwrap(),
            Url::parse("https://panuts.com").unwrap(),
            1,
        )
    }

    #[rstest]
    #[case("/producto/malbec-reserva/", true)]
    #[case("/producto/malbec-reserva", true)]
    #[case("/en/product/olive-oil/", true)]
    #[case("/producto/", false)]
    #[case("/blog/post/", false)]
    #[case("/producto/vinos/malbec/", false)]
    #[case("/productos/", false)]
    fn test_is_product_path(#[case] path: &str, #[case] expected: bool) {
        let parser = ProductListParser::new().unwrap();
        assert_eq!(parser.is_product_path(path), expected);
    }

    #[test]
    fn test_parser_creation() {
        assert!(ProductListParser::new().is_ok());
    }

    #[test]
    fn test_collects_products_pagination_and_categories() {
        let parser = ProductListParser::new().unwrap();
        let body = r#"
            <ul class="products">
              <li><a href="/producto/malbec-reserva/">Malbec</a></li>
              <li><a href="producto/pisco-quebranta/">Pisco</a></li>
              <li><a href="https://other.example/producto/fake/">Fake</a></li>
              <li><a href="/producto/">Todos</a></li>
              <li><a href="/blog/post/">Blog</a></li>
            </ul>
            <nav><a class="next page-numbers" href="/tienda/page/2/">→</a></nav>
            <ul class="product-categories"><li><a href="/categoria/vinos/">Vinos</a></li></ul>"#;

        let links = parser.parse_page(body, &context("https://panuts.com/tienda/")).unwrap();

        assert_eq!(
            links.product_urls,
            vec![
                "https://panuts.com/producto/malbec-reserva/",
                "https://panuts.com/tienda/producto/pisco-quebranta/"
            ]
        );
        assert_eq!(links.next_pages, vec!["https://panuts.com/tienda/page/2/"]);
        assert_eq!(links.category_pages, vec!["https://panuts.com/categoria/vinos/"]);
        assert_eq!(links.listing_targets().count(), 2);
    }

    #[test]
    fn test_page_without_links_is_empty() {
        let parser = ProductListParser::new().unwrap();
        let links = parser
            .parse_page("<p>Sin productos</p>", &context("https://panuts.com/shop/"))
            .unwrap();
        assert_eq!(links, ListingLinks::default());
    }
}
