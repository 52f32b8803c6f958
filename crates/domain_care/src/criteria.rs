//! Validation of caller-supplied criteria
//!
//! Checks run before a query is built so malformed input never reaches
//! storage.

use validator::Validate;

use core_kernel::CoreError;

/// Longest search term accepted by substring finders
pub const MAX_TERM_LENGTH: u64 = 100;

#[derive(Debug, Validate)]
struct SearchTerm {
    #[validate(length(max = 100, message = "search terms are limited to 100 characters"))]
    value: String,
}

#[derive(Debug, Validate)]
struct LookupKey {
    #[validate(length(min = 1, max = 255, message = "lookup keys must be 1 to 255 characters"))]
    value: String,
}

/// Accepts a substring search term; an empty term matches every value
pub fn search_term(field: &str, term: &str) -> Result<String, CoreError> {
    let candidate = SearchTerm {
        value: term.to_string(),
    };
    candidate
        .validate()
        .map_err(|e| CoreError::validation(format!("{}: {}", field, e)))?;
    Ok(candidate.value)
}

/// Accepts an exact-match key, trimmed and non-empty
pub fn lookup_key(field: &str, key: &str) -> Result<String, CoreError> {
    let candidate = LookupKey {
        value: key.trim().to_string(),
    };
    candidate
        .validate()
        .map_err(|e| CoreError::validation(format!("{}: {}", field, e)))?;
    Ok(candidate.value)
}
