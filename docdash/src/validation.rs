//! Checks that run before any request is issued.

use crate::error::{DashboardError, Result};

pub const MISSING_FILE: &str = "Please select a file";
pub const MISSING_FILE_NAME: &str = "Please enter a file name";
pub const MISSING_QUERY: &str = "Please enter a query";
pub const MISSING_SEARCH_QUERY: &str = "Please enter a search query";
pub const MISSING_DOCUMENT: &str = "Please select a document";

/// Trimmed `value`, or a validation error carrying `message` when it is blank.
pub fn require_text<'a>(value: &'a str, message: &str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DashboardError::Validation(message.to_string()));
    }
    Ok(trimmed)
}

/// Empty or whitespace-only filters mean "all documents".
pub fn optional_filter(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
