//! Repository error types
//!
//! This is the taxonomy callers of the query layer see. Criteria problems are
//! raised before storage is touched; storage problems are propagated as-is
//! and never retried here.

use core_kernel::{CoreError, TemporalError};
use thiserror::Error;

/// Errors returned by repository finder operations
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The criteria were malformed (bad enum text, page, sort or range)
    #[error("Validation error: {0}")]
    Validation(#[from] CoreError),

    /// A lookup expecting at most one row found several
    #[error("Ambiguous result: {matches} {entity} records matched a lookup expecting at most one")]
    AmbiguousResult {
        entity: &'static str,
        matches: u64,
    },

    /// Storage could not be reached or the pool is exhausted
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// Storage rejected the query
    #[error("Query failed: {0}")]
    Query(String),

    /// A stored row could not be turned into an entity
    #[error("Mapping error: {0}")]
    Mapping(String),
}

impl RepositoryError {
    pub fn validation(message: impl Into<String>) -> Self {
        RepositoryError::Validation(CoreError::validation(message))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, RepositoryError::Validation(_))
    }

    pub fn is_ambiguous(&self) -> bool {
        matches!(self, RepositoryError::AmbiguousResult { .. })
    }

    /// Returns true if the failure may clear up on its own
    ///
    /// Retrying is the caller's decision; nothing in this crate retries.
    pub fn is_transient(&self) -> bool {
        matches!(self, RepositoryError::Unavailable(_))
    }
}

impl From<TemporalError> for RepositoryError {
    fn from(error: TemporalError) -> Self {
        RepositoryError::Validation(CoreError::Temporal(error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temporal_error_is_validation() {
        let error: RepositoryError = TemporalError::InvalidRange {
            from: "b".into(),
            to: "a".into(),
        }
        .into();
        assert!(error.is_validation());
        assert!(!error.is_transient());
    }

    #[test]
    fn test_ambiguous_message_names_entity() {
        let error = RepositoryError::AmbiguousResult {
            entity: "MealRecord",
            matches: 2,
        };
        assert!(error.is_ambiguous());
        assert!(error.to_string().contains("2 MealRecord records"));
    }
}
