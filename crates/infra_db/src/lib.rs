//! Infrastructure Database Layer
//!
//! PostgreSQL adapter for the care records query layer. Repositories from
//! `domain_care` run against [`PgRecordStore`], which renders each finder
//! [`core_kernel::Query`] into one parameterised statement with SQLx.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_care::NoticeRepository;
//! use infra_db::{create_pool, DatabaseSettings, PgRecordStore};
//!
//! let settings = DatabaseSettings::from_env()?;
//! let pool = create_pool(settings.pool_config()).await?;
//! let notices = NoticeRepository::new(PgRecordStore::new(pool));
//! ```
//!
//! The schema itself is managed outside this crate; the tables and columns
//! it expects are listed by the [`tables::Table`] implementations.

pub mod error;
pub mod pool;
pub mod settings;
pub mod sql;
pub mod tables;
pub mod store;

pub use error::DatabaseError;
pub use pool::{create_pool, ping, DatabaseConfig, DatabasePool, DEFAULT_DATABASE_URL};
pub use settings::DatabaseSettings;
pub use store::PgRecordStore;
pub use tables::Table;
