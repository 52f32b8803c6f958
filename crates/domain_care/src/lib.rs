//! Care Domain - entities and query repositories
//!
//! This crate defines the queryable records of a residential disability-care
//! service and one repository per record type. Every repository method is an
//! explicit finder: its doc comment states the predicate, and the predicate
//! is built as a [`core_kernel::Predicate`] tree rather than inferred from a
//! method name.
//!
//! # Architecture
//!
//! Repositories are generic over a [`RecordStore`] port:
//!
//! ```rust,ignore
//! use domain_care::{ClientRepository, MemoryStore};
//! use core_kernel::{PageRequest, StatusFilter};
//!
//! let clients = ClientRepository::new(MemoryStore::new());
//! let page = clients
//!     .search_by_name_or_house_code("jo", "h1", StatusFilter::Active, &PageRequest::new(1, 20))
//!     .await?;
//! ```
//!
//! # Finder shapes
//!
//! - **Exact match**: zero or one row; several rows raise `AmbiguousResult`
//! - **Filtered list**: a page plus a total from the identical predicate
//! - **Count**: the total alone
//! - **Unpaged list**: every match in insertion order

#[macro_use]
mod macros;

pub mod error;
pub mod ports;
pub mod memory;
pub mod criteria;
mod finder;

pub mod house;
pub mod client;
pub mod user;
pub mod incident;
pub mod note;
pub mod document;
pub mod contact;
pub mod ndis_plan;
pub mod notice;
pub mod meal;

pub use error::RepositoryError;
pub use ports::RecordStore;
pub use memory::MemoryStore;

pub use house::{House, HouseRepository};
pub use client::{Client, ClientRepository};
pub use user::{User, UserRepository, UserRole};
pub use incident::{Incident, IncidentCategory, IncidentRepository, IncidentState, Severity};
pub use note::{Note, NoteCategory, NoteRepository};
pub use document::{Document, DocumentCategory, DocumentRepository};
pub use contact::{Contact, ContactRepository};
pub use ndis_plan::{NdisPlan, NdisPlanRepository};
pub use notice::{Notice, NoticeRepository, NoticeState, NOTICE_HOUSES};
pub use meal::{MealRecord, MealRecordRepository, MealType};
