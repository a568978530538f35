//! Parsing error types
//!
//! Extraction never panics on odd markup; it reports one of these and the
//! caller decides whether the page is skipped.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParsingError {
    #[error("Required field '{field}' not found in {url}")]
    RequiredFieldMissing { field: String, url: String },

    #[error("Invalid pattern: {pattern} - {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("No valid selectors compiled for '{group}': {errors}")]
    NoValidSelectors { group: String, errors: String },

    #[error("Structured data block could not be read: {reason}")]
    StructuredData { reason: String },

    #[error("URL resolution failed: {url} - {reason}")]
    UrlResolutionFailed { url: String, reason: String },
}

impl ParsingError {
    /// Create a required field missing error for a page
    pub fn required_field_missing(field: &str, url: &str) -> Self {
        Self::RequiredFieldMissing {
            field: field.to_string(),
            url: url.to_string(),
        }
    }

    /// True when the page simply lacks a record (as opposed to a setup problem)
    pub const fn is_missing_record(&self) -> bool {
        matches!(self, Self::RequiredFieldMissing { .. })
    }
}

pub type ParsingResult<T> = Result<T, ParsingError>;
