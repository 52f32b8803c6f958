//! Core error types used across the system

use thiserror::Error;
use crate::temporal::TemporalError;

/// Core error type for the kernel
///
/// Every variant describes malformed criteria: these are raised while a query
/// is being built, before anything reaches storage.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("Temporal error: {0}")]
    Temporal(#[from] TemporalError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid {kind}: '{value}'")]
    InvalidValue {
        kind: String,
        value: String,
    },

    #[error("Cannot sort {entity} by '{field}'")]
    InvalidSort {
        entity: String,
        field: String,
    },
}

impl CoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        CoreError::Validation(message.into())
    }

    pub fn invalid_value(kind: impl Into<String>, value: impl Into<String>) -> Self {
        CoreError::InvalidValue {
            kind: kind.into(),
            value: value.into(),
        }
    }

    pub fn invalid_sort(entity: impl Into<String>, field: impl Into<String>) -> Self {
        CoreError::InvalidSort {
            entity: entity.into(),
            field: field.into(),
        }
    }
}

impl From<validator::ValidationErrors> for CoreError {
    fn from(errors: validator::ValidationErrors) -> Self {
        CoreError::Validation(errors.to_string())
    }
}
