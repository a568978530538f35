use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Maximum characters kept from the full product description
pub const DESCRIPTION_MAX_CHARS: usize = 2000;

/// Maximum characters kept from the short description
pub const SHORT_DESCRIPTION_MAX_CHARS: usize = 500;

/// Maximum number of image URLs kept per product
pub const MAX_IMAGES: usize = 5;

/// Product facets collected from the attribute block or structured data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeKey {
    Marca,
    Pais,
    Region,
    Tipo,
    Varietal,
    Volumen,
}

impl AttributeKey {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Marca => "marca",
            Self::Pais => "pais",
            Self::Region => "region",
            Self::Tipo => "tipo",
            Self::Varietal => "varietal",
            Self::Volumen => "volumen",
        }
    }
}

impl fmt::Display for AttributeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attribute dictionary; keys can only come from [`AttributeKey`].
pub type ProductAttributes = BTreeMap<AttributeKey, String>;

/// Availability inferred from the product page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockStatus {
    #[default]
    InStock,
    OutOfStock,
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InStock => f.write_str("instock"),
            Self::OutOfStock => f.write_str("outofstock"),
        }
    }
}

/// One scraped product page, in the field order written to `products.json`.
///
/// Every field has a serde default, and `null` reads as that default, so that
/// output written by older runs (or edited by hand) can still be read back by
/// the attribute enricher.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Product {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub sku: String,
    /// Effective selling price
    #[serde(deserialize_with = "null_as_default")]
    pub price: f64,
    /// List price; equals `price` when no struck-through price exists
    #[serde(deserialize_with = "null_as_default")]
    pub regular_price: f64,
    /// Only set in a discount context (see [`Product::resolve_prices`])
    pub sale_price: Option<f64>,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub short_description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub categories: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub images: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub stock_status: StockStatus,
    /// Empty when the record has no page to revisit
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub source: String,
    #[serde(deserialize_with = "null_as_default")]
    pub external_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub attributes: ProductAttributes,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Resolved price triple for a product
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceFields {
    pub price: f64,
    pub regular_price: f64,
    pub sale_price: Option<f64>,
}

impl Product {
    /// Combine the three raw price readings into the stored price fields.
    ///
    /// A reading of `0.0` means the zone was absent or unparseable.
    /// The sale price is only kept when a struck-through regular price was found
    /// and the sale reading is strictly below it.
    pub fn resolve_prices(sale: f64, struck_through: f64, current: f64) -> PriceFields {
        let price = if sale > 0.0 { sale } else { current };
        let regular_price = if struck_through > 0.0 { struck_through } else { price };
        let sale_price = (struck_through > 0.0 && sale > 0.0 && sale < struck_through).then_some(sale);

        PriceFields {
            price,
            regular_price,
            sale_price,
        }
    }

    /// Last non-empty path segment of a product URL, used as `external_id`.
    pub fn external_id_from_url(url: &str) -> String {
        let path = url::Url::parse(url)
            .map(|parsed| parsed.path().to_string())
            .unwrap_or_else(|_| url.to_string());

        path.split('/')
            .filter(|segment| !segment.is_empty())
            .next_back()
            .unwrap_or_default()
            .to_string()
    }
}

/// Truncate to at most `max_chars` characters without splitting a code point.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => text[..byte_index].to_string(),
        None => text.to_string(),
    }
}
