//! Locale-aware price parsing
//!
//! Handles both separator conventions seen on the catalogue:
//! - English:  `1,556.00` (comma = thousands, dot = decimal)
//! - Spanish:  `1.556,00` (dot = thousands, comma = decimal)

/// Parse a displayed price into a number.
///
/// Returns `0.0` when nothing parseable remains; zero is the "no reading" sentinel.
pub fn parse_price(text: &str) -> f64 {
    let filtered: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .collect();

    // Leading/trailing dots come from prefixes like "S/."
    let cleaned = filtered.trim_matches('.');
    if cleaned.is_empty() {
        return 0.0;
    }

    let normalized = match (cleaned.rfind(','), cleaned.rfind('.')) {
        (Some(comma), Some(dot)) if dot > comma => cleaned.replace(',', ""),
        (Some(_), Some(_)) => cleaned.replace('.', "").replace(',', "."),
        (Some(_), None) => cleaned.replace(',', "."),
        _ => cleaned.to_string(),
    };

    normalized
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value >= 0.0)
        .unwrap_or(0.0)
}
