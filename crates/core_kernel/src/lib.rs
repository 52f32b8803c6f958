//! Core Kernel - Foundational types for the care records query layer
//!
//! This crate provides the building blocks shared by the domain and
//! infrastructure crates:
//! - Numeric surrogate identifiers for every entity
//! - Record lifecycle status replacing the soft-delete flag
//! - Validity windows and inclusive date ranges
//! - The predicate tree that describes every finder operation
//! - Page requests and result pages

pub mod identifiers;
pub mod lifecycle;
pub mod temporal;
pub mod query;
pub mod pagination;
pub mod error;

pub use identifiers::{
    ClientId, ContactId, DocumentId, HouseId, IncidentId, MealRecordId, NdisPlanId, NoteId,
    NoticeId, UserId,
};
pub use lifecycle::{RecordStatus, StatusFilter, STATUS_COLUMN};
pub use temporal::{DateRange, TemporalError, ValidityWindow};
pub use query::{Comparison, Predicate, Query, Record, Relation, SortKey, Value, Window};
pub use pagination::{Page, PageRequest, Sort, SortDirection, MAX_PAGE_SIZE};
pub use error::CoreError;
