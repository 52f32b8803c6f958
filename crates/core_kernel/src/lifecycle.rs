//! Record lifecycle status
//!
//! Records are never physically removed by application code; they move from
//! `Active` to `Deleted`. Storing the status as an explicit value (rather than
//! a bare boolean) and attaching the status clause inside [`crate::Query`]
//! means a finder cannot silently leak deleted rows by forgetting a filter.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::query::{Predicate, Value};

/// Column holding the lifecycle status on every table
pub const STATUS_COLUMN: &str = "record_status";

/// Lifecycle status of a stored record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    #[default]
    Active,
    Deleted,
}

impl RecordStatus {
    /// Maps the legacy soft-delete flag onto a status
    pub fn from_deleted_flag(deleted: bool) -> Self {
        if deleted {
            RecordStatus::Deleted
        } else {
            RecordStatus::Active
        }
    }

    /// Returns the stored text form
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordStatus::Active => "active",
            RecordStatus::Deleted => "deleted",
        }
    }

    pub fn is_deleted(&self) -> bool {
        matches!(self, RecordStatus::Deleted)
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(RecordStatus::Active),
            "deleted" => Ok(RecordStatus::Deleted),
            other => Err(CoreError::invalid_value("record status", other)),
        }
    }
}

impl From<RecordStatus> for Value {
    fn from(status: RecordStatus) -> Value {
        Value::Text(status.as_str().to_string())
    }
}

/// Which lifecycle states a query should see
///
/// Defaults to `Active`, so a caller has to ask for deleted rows explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    #[default]
    Active,
    Deleted,
    Any,
}

impl StatusFilter {
    /// Maps the legacy `deleted = ?` finder argument onto a filter
    pub fn from_deleted_flag(deleted: bool) -> Self {
        if deleted {
            StatusFilter::Deleted
        } else {
            StatusFilter::Active
        }
    }

    /// Returns true if a record in `status` passes this filter
    pub fn admits(&self, status: RecordStatus) -> bool {
        match self {
            StatusFilter::Active => status == RecordStatus::Active,
            StatusFilter::Deleted => status == RecordStatus::Deleted,
            StatusFilter::Any => true,
        }
    }

    /// The clause this filter contributes, `None` for `Any`
    pub fn predicate(&self) -> Option<Predicate> {
        let status = match self {
            StatusFilter::Active => RecordStatus::Active,
            StatusFilter::Deleted => RecordStatus::Deleted,
            StatusFilter::Any => return None,
        };
        Some(Predicate::eq(STATUS_COLUMN, status))
    }
}

impl FromStr for StatusFilter {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(StatusFilter::Active),
            "deleted" => Ok(StatusFilter::Deleted),
            "any" | "all" => Ok(StatusFilter::Any),
            other => Err(CoreError::invalid_value("status filter", other)),
        }
    }
}
