//! Domain module - the product record and its value types
//!
//! Everything here is plain data plus the pure rules that shape it (price
//! resolution, truncation, external id); no I/O.

pub mod product;

pub use product::{
    AttributeKey, DESCRIPTION_MAX_CHARS, MAX_IMAGES, PriceFields, Product, ProductAttributes,
    SHORT_DESCRIPTION_MAX_CHARS, StockStatus,
};
