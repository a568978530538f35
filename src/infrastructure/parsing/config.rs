//! Parsing configuration for HTML extraction
//!
//! Centralized CSS selectors for WooCommerce listing and product pages.
//! Each field is a fallback list: earlier selectors are more specific.

use serde::{Deserialize, Serialize};

/// CSS selectors for catalogue listing pages
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingSelectors {
    /// Every anchor considered for product-URL matching
    pub anchor: Vec<String>,

    /// "Next page" pagination anchors
    pub next_page: Vec<String>,

    /// Category listing anchors
    pub category: Vec<String>,
}

impl Default for ListingSelectors {
    fn default() -> Self {
        Self {
            anchor: vec!["a[href]".to_string()],
            next_page: vec![".next.page-numbers".to_string(), "a.next".to_string()],
            category: vec![
                ".product-categories a".to_string(),
                ".widget_product_categories a".to_string(),
            ],
        }
    }
}

/// CSS selectors for product detail pages
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductPageSelectors {
    /// Product name, most specific first
    pub name: Vec<String>,
    pub sku: Vec<String>,

    /// Discounted price inside `<ins>`
    pub sale_price: Vec<String>,
    /// Struck-through list price inside `<del>`
    pub regular_price: Vec<String>,
    /// Price shown when there is no discount
    pub current_price: Vec<String>,
    /// Inner element holding the amount text, tried inside each price match
    pub price_amount: Vec<String>,

    pub short_description: Vec<String>,
    /// Full description: tab panel, then generic content
    pub description: Vec<String>,

    pub categories: Vec<String>,
    pub tags: Vec<String>,

    /// Full-size gallery links (`href`)
    pub gallery_link: Vec<String>,
    /// Gallery `<img>` elements (`data-large_image`, then `src`)
    pub gallery_image: Vec<String>,

    pub stock: Vec<String>,
    pub add_to_cart: Vec<String>,

    /// Attribute block (definition list or table)
    pub attribute_block: Vec<String>,
    pub attribute_label: Vec<String>,
    pub attribute_value: Vec<String>,

    /// Embedded structured-data scripts
    pub structured_data: Vec<String>,
}

impl Default for ProductPageSelectors {
    fn default() -> Self {
        Self {
            name: vec![
                ".product_title".to_string(),
                "h1.entry-title".to_string(),
                "h1".to_string(),
            ],
            sku: vec![".sku".to_string()],
            sale_price: vec![".price ins bdi".to_string(), ".price ins .amount".to_string()],
            regular_price: vec![".price del bdi".to_string(), ".price del .amount".to_string()],
            current_price: vec![
                ".price > .woocommerce-Price-amount bdi".to_string(),
                ".price bdi".to_string(),
                ".price .amount".to_string(),
            ],
            price_amount: vec!["bdi".to_string()],
            short_description: vec![".woocommerce-product-details__short-description".to_string()],
            description: vec![
                "#tab-description .woocommerce-Tabs-panel".to_string(),
                "#tab-description".to_string(),
                ".entry-content".to_string(),
            ],
            categories: vec![".posted_in a".to_string()],
            tags: vec![".tagged_as a".to_string()],
            gallery_link: vec![".woocommerce-product-gallery__image a".to_string()],
            gallery_image: vec![".woocommerce-product-gallery__image img".to_string()],
            stock: vec![".stock".to_string()],
            add_to_cart: vec![".single_add_to_cart_button".to_string()],
            attribute_block: vec![
                "dl.woocommerce-product-attributes".to_string(),
                "table.woocommerce-product-attributes".to_string(),
            ],
            attribute_label: vec!["dt".to_string(), "th".to_string()],
            attribute_value: vec!["dd".to_string(), "td".to_string()],
            structured_data: vec![r#"script[type="application/ld+json"]"#.to_string()],
        }
    }
}
