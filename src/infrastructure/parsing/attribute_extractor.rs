//! Product attribute extraction
//!
//! Two sources exist on product pages:
//! 1. The WooCommerce attribute block (`dl`/`table.woocommerce-product-attributes`),
//!    present on nearly every page.
//! 2. JSON-LD `additionalProperty` entries, sparse but independent.
//!
//! The first non-empty source wins; results are never merged.

use scraper::{Html, Selector};
use serde_json::Value;
use tracing::debug;

use super::config::ProductPageSelectors;
use super::{ParsingError, ParsingResult, collapse_whitespace, compile_selectors, element_text_spaced, select_first, select_from_multiple};
use crate::domain::{AttributeKey, ProductAttributes};
use crate::infrastructure::config::AttributeStrategy;

/// Prefix WooCommerce puts on taxonomy attribute names in structured data
pub const STRUCTURED_DATA_NAME_PREFIX: &str = "pa_";

/// Normalized label → attribute key
const LABEL_TABLE: &[(&str, AttributeKey)] = &[
    ("marca", AttributeKey::Marca),
    ("pais", AttributeKey::Pais),
    ("país", AttributeKey::Pais),
    ("region", AttributeKey::Region),
    ("región", AttributeKey::Region),
    ("tipo", AttributeKey::Tipo),
    ("varietal", AttributeKey::Varietal),
    ("volumen", AttributeKey::Volumen),
];

fn strip_diacritics(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'ö' | 'õ' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ñ' => 'n',
            'ç' => 'c',
            'ý' | 'ÿ' => 'y',
            _ => c,
        })
        .collect()
}

/// Lower-case, trim and strip diacritics so `"País"` and `"pais"` compare equal
pub fn normalize_label(text: &str) -> String {
    strip_diacritics(&text.trim().to_lowercase())
}

/// Map a raw label to an attribute key; unknown labels yield `None`
pub fn lookup_label(label: &str) -> Option<AttributeKey> {
    let normalized = normalize_label(label);
    LABEL_TABLE
        .iter()
        .find(|(candidate, _)| *candidate == normalized)
        .map(|(_, key)| *key)
}

/// Extracts the attribute dictionary from a product page
pub struct AttributeExtractor {
    strategy: AttributeStrategy,
    block_selectors: Vec<Selector>,
    label_selectors: Vec<Selector>,
    value_selectors: Vec<Selector>,
    structured_data_selectors: Vec<Selector>,
}

impl AttributeExtractor {
    /// Create an extractor with the default WooCommerce selectors
    pub fn new(strategy: AttributeStrategy) -> ParsingResult<Self> {
        Self::with_config(strategy, &ProductPageSelectors::default())
    }

    /// Create an extractor with custom selector configuration
    pub fn with_config(strategy: AttributeStrategy, selectors: &ProductPageSelectors) -> ParsingResult<Self> {
        Ok(Self {
            strategy,
            block_selectors: compile_selectors("attribute_block", &selectors.attribute_block)?,
            label_selectors: compile_selectors("attribute_label", &selectors.attribute_label)?,
            value_selectors: compile_selectors("attribute_value", &selectors.attribute_value)?,
            structured_data_selectors: compile_selectors("structured_data", &selectors.structured_data)?,
        })
    }

    pub const fn strategy(&self) -> AttributeStrategy {
        self.strategy
    }

    /// Attributes for a page according to the configured strategy
    pub fn extract(&self, html: &Html) -> ProductAttributes {
        if self.strategy == AttributeStrategy::Dual {
            let attributes = self.from_attribute_list(html);
            if !attributes.is_empty() {
                debug!("Extracted {} attributes from attribute list", attributes.len());
                return attributes;
            }
        }

        let attributes = self.from_structured_data(html);
        if !attributes.is_empty() {
            debug!("Extracted {} attributes from structured data", attributes.len());
        }
        attributes
    }

    /// Strategy 1: positional label/value pairs from the attribute block
    pub fn from_attribute_list(&self, html: &Html) -> ProductAttributes {
        let mut attributes = ProductAttributes::new();

        let Some(block) = select_first(html.root_element(), &self.block_selectors) else {
            return attributes;
        };

        let labels = select_from_multiple(block, &self.label_selectors);
        let values = select_from_multiple(block, &self.value_selectors);

        for (label, value) in labels.iter().zip(values.iter()) {
            let Some(key) = lookup_label(&element_text_spaced(label)) else {
                continue;
            };
            let text = collapse_whitespace(&element_text_spaced(value));
            if !text.is_empty() {
                attributes.insert(key, text);
            }
        }

        attributes
    }

    /// Strategy 2: `additionalProperty` of the first JSON-LD Product that yields anything
    pub fn from_structured_data(&self, html: &Html) -> ProductAttributes {
        for selector in &self.structured_data_selectors {
            for script in html.select(selector) {
                let raw: String = script.text().collect();
                let data = match parse_structured_data(&raw) {
                    Ok(data) => data,
                    Err(e) => {
                        debug!("Skipping block: {}", e);
                        continue;
                    }
                };

                let attributes = structured_data_attributes(&data);
                if !attributes.is_empty() {
                    return attributes;
                }
            }
        }

        ProductAttributes::new()
    }
}

/// Decode one `application/ld+json` script body
pub fn parse_structured_data(raw: &str) -> ParsingResult<Value> {
    serde_json::from_str(raw.trim()).map_err(|e| ParsingError::StructuredData { reason: e.to_string() })
}

fn is_product_node(value: &Value) -> bool {
    match value.get("@type") {
        Some(Value::String(kind)) => kind == "Product",
        Some(Value::Array(kinds)) => kinds.iter().any(|k| k.as_str() == Some("Product")),
        _ => false,
    }
}

/// The Product node of a JSON-LD document: the document itself, or the
/// first Product entry when the top level is an array
fn product_node(data: &Value) -> Option<&Value> {
    match data {
        Value::Array(entries) => entries.iter().find(|entry| entry.is_object() && is_product_node(entry)),
        Value::Object(_) if is_product_node(data) => Some(data),
        _ => None,
    }
}

fn json_value_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::Null | Value::Bool(false) => return None,
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    };
    (!text.is_empty()).then_some(text)
}

/// Attribute dictionary from one parsed JSON-LD document
pub fn structured_data_attributes(data: &Value) -> ProductAttributes {
    let mut attributes = ProductAttributes::new();

    let Some(properties) = product_node(data)
        .and_then(|product| product.get("additionalProperty"))
        .and_then(Value::as_array)
    else {
        return attributes;
    };

    for property in properties {
        let Some(name) = property.get("name").and_then(Value::as_str).filter(|n| !n.is_empty()) else {
            continue;
        };
        let Some(value) = property.get("value").and_then(json_value_text) else {
            continue;
        };

        let label = name.strip_prefix(STRUCTURED_DATA_NAME_PREFIX).unwrap_or(name);
        if let Some(key) = lookup_label(label) {
            attributes.insert(key, value);
        }
    }

    attributes
}
