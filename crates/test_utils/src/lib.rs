//! Test Utilities Crate
//!
//! Shared test infrastructure for the care records workspace.
//!
//! # Modules
//!
//! - `fixtures`: Fixed dates and times the scenario tests agree on
//! - `builders`: Builders for every record type with sensible defaults
//! - `database`: PostgreSQL test container, schema and row seeding
//! - `assertions`: Page and lifecycle assertion helpers
//! - `generators`: Property-based record generators

pub mod fixtures;
pub mod builders;
pub mod database;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use database::*;
pub use assertions::*;
pub use generators::*;
