//! Product detail parser
//!
//! Turns one WooCommerce product page into a [`Product`]. Every zone has a
//! selector fallback list; only the name is required.

use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

use super::attribute_extractor::AttributeExtractor;
use super::config::ProductPageSelectors;
use super::context::DetailParseContext;
use super::price::parse_price;
use super::{
    ContextualParser, ParsingError, ParsingResult, collapse_whitespace, compile_selectors, element_text, element_text_spaced,
    select_first, select_from_multiple,
};
use crate::domain::product::truncate_chars;
use crate::domain::{DESCRIPTION_MAX_CHARS, MAX_IMAGES, Product, SHORT_DESCRIPTION_MAX_CHARS, StockStatus};
use crate::infrastructure::config::AttributeStrategy;

/// Tokens in the stock label that mean the product can be bought
const IN_STOCK_TOKENS: &[&str] = &["disponible", "in stock"];

/// Parser for extracting product records from product pages
pub struct ProductDetailParser {
    name_selectors: Vec<Selector>,
    sku_selectors: Vec<Selector>,

    sale_price_selectors: Vec<Selector>,
    regular_price_selectors: Vec<Selector>,
    current_price_selectors: Vec<Selector>,
    price_amount_selectors: Vec<Selector>,

    short_description_selectors: Vec<Selector>,
    description_selectors: Vec<Selector>,
    category_selectors: Vec<Selector>,
    tag_selectors: Vec<Selector>,

    gallery_link_selectors: Vec<Selector>,
    gallery_image_selectors: Vec<Selector>,

    stock_selectors: Vec<Selector>,
    add_to_cart_selectors: Vec<Selector>,

    attribute_extractor: AttributeExtractor,
}

impl ProductDetailParser {
    /// Create a parser with default selectors and the dual attribute strategy
    pub fn new() -> ParsingResult<Self> {
        Self::with_config(&ProductPageSelectors::default(), AttributeStrategy::Dual)
    }

    /// Create parser with custom selector configuration
    pub fn with_config(selectors: &ProductPageSelectors, strategy: AttributeStrategy) -> ParsingResult<Self> {
        Ok(Self {
            name_selectors: compile_selectors("name", &selectors.name)?,
            sku_selectors: compile_selectors("sku", &selectors.sku)?,
            sale_price_selectors: compile_selectors("sale_price", &selectors.sale_price)?,
            regular_price_selectors: compile_selectors("regular_price", &selectors.regular_price)?,
            current_price_selectors: compile_selectors("current_price", &selectors.current_price)?,
            price_amount_selectors: compile_selectors("price_amount", &selectors.price_amount)?,
            short_description_selectors: compile_selectors("short_description", &selectors.short_description)?,
            description_selectors: compile_selectors("description", &selectors.description)?,
            category_selectors: compile_selectors("categories", &selectors.categories)?,
            tag_selectors: compile_selectors("tags", &selectors.tags)?,
            gallery_link_selectors: compile_selectors("gallery_link", &selectors.gallery_link)?,
            gallery_image_selectors: compile_selectors("gallery_image", &selectors.gallery_image)?,
            stock_selectors: compile_selectors("stock", &selectors.stock)?,
            add_to_cart_selectors: compile_selectors("add_to_cart", &selectors.add_to_cart)?,
            attribute_extractor: AttributeExtractor::with_config(strategy, selectors)?,
        })
    }

    /// Parse raw page text; the document never outlives this call
    pub fn parse_page(&self, body: &str, context: &DetailParseContext) -> ParsingResult<Product> {
        let html = Html::parse_document(body);
        self.parse_with_context(&html, context)
    }

    fn extract_name(&self, html: &Html) -> Option<String> {
        self.name_selectors.iter().find_map(|selector| {
            html.select(selector)
                .map(|element| element_text_spaced(&element))
                .find(|text| !text.is_empty())
        })
    }

    fn extract_sku(&self, html: &Html) -> String {
        select_first(html.root_element(), &self.sku_selectors)
            .map(|element| element_text(&element))
            .unwrap_or_default()
    }

    /// First positive amount found in a price zone; `0.0` when none
    fn price_reading(&self, html: &Html, selectors: &[Selector]) -> f64 {
        for selector in selectors {
            for element in html.select(selector) {
                let text = select_first(element, &self.price_amount_selectors)
                    .map(|amount| element_text(&amount))
                    .unwrap_or_else(|| element_text(&element));
                let value = parse_price(&text);
                if value > 0.0 {
                    return value;
                }
            }
        }
        0.0
    }

    fn zone_text(&self, html: &Html, selectors: &[Selector]) -> Option<String> {
        selectors.iter().find_map(|selector| {
            html.select(selector)
                .map(|element| collapse_whitespace(&element_text_spaced(&element)))
                .find(|text| !text.is_empty())
        })
    }

    fn link_texts(&self, html: &Html, selectors: &[Selector]) -> Vec<String> {
        select_from_multiple(html.root_element(), selectors)
            .iter()
            .map(element_text_spaced)
            .filter(|text| !text.is_empty())
            .collect()
    }

    fn extract_images(&self, html: &Html, page_url: Option<&Url>) -> Vec<String> {
        let root = html.root_element();

        let mut raw: Vec<String> = select_from_multiple(root, &self.gallery_link_selectors)
            .iter()
            .filter_map(|link| link.value().attr("href"))
            .map(str::trim)
            .filter(|href| !href.is_empty())
            .map(str::to_string)
            .collect();

        if raw.is_empty() {
            raw = select_from_multiple(root, &self.gallery_image_selectors)
                .iter()
                .filter_map(|img| {
                    let value = img.value();
                    value
                        .attr("data-large_image")
                        .filter(|src| !src.trim().is_empty())
                        .or_else(|| value.attr("src"))
                })
                .map(str::trim)
                .filter(|src| !src.is_empty())
                .map(str::to_string)
                .collect();
        }

        raw.into_iter()
            .map(|src| resolve_image_url(&src, page_url))
            .take(MAX_IMAGES)
            .collect()
    }

    fn extract_stock_status(&self, html: &Html) -> StockStatus {
        let root = html.root_element();

        if let Some(label) = select_first(root, &self.stock_selectors) {
            let text = element_text_spaced(&label).to_lowercase();
            return if IN_STOCK_TOKENS.iter().any(|token| text.contains(token)) {
                StockStatus::InStock
            } else {
                StockStatus::OutOfStock
            };
        }

        if select_first(root, &self.add_to_cart_selectors).is_some() {
            StockStatus::InStock
        } else {
            StockStatus::OutOfStock
        }
    }
}

fn resolve_image_url(src: &str, page_url: Option<&Url>) -> String {
    match page_url.and_then(|base| base.join(src).ok()) {
        Some(absolute) => absolute.to_string(),
        None => src.to_string(),
    }
}

impl ContextualParser for ProductDetailParser {
    type Output = Product;
    type Context = DetailParseContext;

    fn parse_with_context(&self, html: &Html, context: &Self::Context) -> ParsingResult<Self::Output> {
        let name = self
            .extract_name(html)
            .ok_or_else(|| ParsingError::required_field_missing("name", &context.url))?;

        let sale = self.price_reading(html, &self.sale_price_selectors);
        let struck_through = self.price_reading(html, &self.regular_price_selectors);
        let current = self.price_reading(html, &self.current_price_selectors);
        let prices = Product::resolve_prices(sale, struck_through, current);

        let short_description = self.zone_text(html, &self.short_description_selectors).unwrap_or_default();
        let description = self
            .zone_text(html, &self.description_selectors)
            .unwrap_or_else(|| short_description.clone());

        let page_url = context.page_url();
        let product = Product {
            name,
            sku: self.extract_sku(html),
            price: prices.price,
            regular_price: prices.regular_price,
            sale_price: prices.sale_price,
            description: truncate_chars(&description, DESCRIPTION_MAX_CHARS),
            short_description: truncate_chars(&short_description, SHORT_DESCRIPTION_MAX_CHARS),
            categories: self.link_texts(html, &self.category_selectors),
            tags: self.link_texts(html, &self.tag_selectors),
            images: self.extract_images(html, page_url.as_ref()),
            stock_status: self.extract_stock_status(html),
            url: context.url.clone(),
            source: context.source.clone(),
            external_id: Product::external_id_from_url(&context.url),
            attributes: self.attribute_extractor.extract(html),
        };

        debug!(
            "Parsed product '{}' (price {}, {} images, {} attributes)",
            product.name,
            product.price,
            product.images.len(),
            product.attributes.len()
        );

        Ok(product)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AttributeKey;

    const URL: &str = "https://panuts.com/producto/malbec-reserva/";

    const SALE_PAGE: &str = r#"
        <html><body>
          <div class="woocommerce-product-gallery">
            <div class="woocommerce-product-gallery__image"><a href="/wp-content/uploads/malbec-1.jpg"><img src="/thumb-1.jpg"></a></div>
            <div class="woocommerce-product-gallery__image"><a href="https://cdn.panuts.com/malbec-2.jpg"><img src="/thumb-2.jpg"></a></div>
          </div>
          <h1 class="product_title entry-title">Malbec Reserva 2020</h1>
          <p class="price">
            <del><span class="woocommerce-Price-amount amount"><bdi><span class="woocommerce-Price-currencySymbol">$</span>1.556,00</bdi></span></del>
            <ins><span class="woocommerce-Price-amount amount"><bdi><span class="woocommerce-Price-currencySymbol">$</span>1.245,50</bdi></span></ins>
          </p>
          <div class="woocommerce-product-details__short-description"><p>Tinto   intenso.</p></div>
          <p class="stock in-stock">Disponible</p>
          <div class="product_meta">
            <span class="sku_wrapper">SKU: <span class="sku">MB-2020</span></span>
            <span class="posted_in"><a href="/c/vinos/">Vinos</a>, <a href="/c/tintos/">Tintos</a></span>
            <span class="tagged_as"><a href="/t/malbec/">malbec</a></span>
          </div>
          <div id="tab-description" class="woocommerce-Tabs-panel"><h2>Descripción</h2><p>Un malbec de altura.</p></div>
          <table class="woocommerce-product-attributes shop_attributes">
            <tr><th>País</th><td><p>Argentina</p></td></tr>
            <tr><th>Varietal</th><td><p>Malbec</p></td></tr>
          </table>
        </body></html>"#;

    fn parse(body: &str) -> ParsingResult<Product> {
        let parser = ProductDetailParser::new().unwrap();
        parser.parse_page(body, &DetailParseContext::new(URL, "panuts.com"))
    }

    #[test]
    fn test_parser_creation() {
        assert!(ProductDetailParser::new().is_ok());
    }

    #[test]
    fn test_parses_discounted_product() {
        let product = parse(SALE_PAGE).unwrap();

        assert_eq!(product.name, "Malbec Reserva 2020");
        assert_eq!(product.sku, "MB-2020");
        assert_eq!(product.price, 1245.5);
        assert_eq!(product.regular_price, 1556.0);
        assert_eq!(product.sale_price, Some(1245.5));
        assert_eq!(product.short_description, "Tinto intenso.");
        assert_eq!(product.description, "Descripción Un malbec de altura.");
        assert_eq!(product.categories, vec!["Vinos", "Tintos"]);
        assert_eq!(product.tags, vec!["malbec"]);
        assert_eq!(
            product.images,
            vec![
                "https://panuts.com/wp-content/uploads/malbec-1.jpg",
                "https://cdn.panuts.com/malbec-2.jpg"
            ]
        );
        assert_eq!(product.stock_status, StockStatus::InStock);
        assert_eq!(product.url, URL);
        assert_eq!(product.source, "panuts.com");
        assert_eq!(product.external_id, "malbec-reserva");
        assert_eq!(product.attributes[&AttributeKey::Pais], "Argentina");
        assert_eq!(product.attributes[&AttributeKey::Varietal], "Malbec");
    }

    #[test]
    fn test_missing_name_yields_no_record() {
        let body = SALE_PAGE.replace(r#"<h1 class="product_title entry-title">Malbec Reserva 2020</h1>"#, "");
        let err = parse(&body).unwrap_err();
        assert!(err.is_missing_record());
    }

    #[test]
    fn test_plain_price_without_discount() {
        let product = parse(
            r#"<h1>Aceite de oliva</h1>
               <p class="price"><span class="woocommerce-Price-amount amount"><bdi>S/.&nbsp;45.90</bdi></span></p>
               <button class="single_add_to_cart_button">Añadir</button>"#,
        )
        .unwrap();

        assert_eq!(product.price, 45.9);
        assert_eq!(product.regular_price, 45.9);
        assert_eq!(product.sale_price, None);
        assert_eq!(product.sku, "");
        assert_eq!(product.stock_status, StockStatus::InStock);
        assert!(product.attributes.is_empty());
    }

    #[test]
    fn test_sale_zone_without_struck_through_price_is_not_a_discount() {
        let product = parse(
            r#"<h1>Pisco</h1>
               <p class="price"><ins><span class="amount"><bdi>80.00</bdi></span></ins></p>"#,
        )
        .unwrap();

        assert_eq!(product.price, 80.0);
        assert_eq!(product.regular_price, 80.0);
        assert_eq!(product.sale_price, None);
    }

    #[test]
    fn test_stock_label_without_token_is_out_of_stock() {
        let product = parse(
            r#"<h1>Vino</h1><p class="stock out-of-stock">Agotado</p>
               <button class="single_add_to_cart_button">Añadir</button>"#,
        )
        .unwrap();
        assert_eq!(product.stock_status, StockStatus::OutOfStock);

        let product = parse("<h1>Vino</h1>").unwrap();
        assert_eq!(product.stock_status, StockStatus::OutOfStock);
    }

    #[test]
    fn test_images_fall_back_to_img_attributes_and_cap() {
        let gallery: String = (1..=7)
            .map(|i| {
                format!(
                    r#"<div class="woocommerce-product-gallery__image"><img data-large_image="/large-{i}.jpg" src="/small-{i}.jpg"></div>"#
                )
            })
            .collect();
        let product = parse(&format!("<h1>Vino</h1>{gallery}")).unwrap();

        assert_eq!(product.images.len(), MAX_IMAGES);
        assert_eq!(product.images[0], "https://panuts.com/large-1.jpg");
    }

    #[test]
    fn test_descriptions_are_truncated_and_fall_back() {
        let long = "x".repeat(SHORT_DESCRIPTION_MAX_CHARS + 50);
        let product = parse(&format!(
            r#"<h1>Vino</h1><div class="woocommerce-product-details__short-description">{long}</div>"#
        ))
        .unwrap();

        assert_eq!(product.short_description.chars().count(), SHORT_DESCRIPTION_MAX_CHARS);
        assert_eq!(product.description, long);
    }
}
