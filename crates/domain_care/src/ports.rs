//! Storage port for the query repositories
//!
//! Repositories build a [`Query`] and hand it to a [`RecordStore`]. Two
//! adapters exist:
//!
//! - **PostgreSQL** (`infra_db::PgRecordStore`): renders the query to SQL
//! - **In-memory** ([`crate::MemoryStore`]): evaluates the same predicate in
//!   process, for tests and fixtures
//!
//! ```rust,ignore
//! let store = PgRecordStore::<Client>::new(pool);
//! let clients = ClientRepository::new(store);
//! let page = clients
//!     .search_by_name_or_house_code("jo", "h1", StatusFilter::Active, &PageRequest::new(1, 20))
//!     .await?;
//! ```

use async_trait::async_trait;
use std::sync::Arc;

use core_kernel::{Query, Record};

use crate::error::RepositoryError;

/// Executes finder queries for one entity type
///
/// `fetch` honours the query's sort and window; `count` ignores both. Both
/// must filter on `query.predicate()` so that counts and pages agree.
#[async_trait]
pub trait RecordStore<R: Record>: Send + Sync {
    /// Returns the rows matching the query, ordered and windowed
    async fn fetch(&self, query: &Query) -> Result<Vec<R>, RepositoryError>;

    /// Returns how many rows match the query's predicate
    async fn count(&self, query: &Query) -> Result<u64, RepositoryError>;
}

#[async_trait]
impl<R, S> RecordStore<R> for Arc<S>
where
    R: Record,
    S: RecordStore<R> + ?Sized,
{
    async fn fetch(&self, query: &Query) -> Result<Vec<R>, RepositoryError> {
        (**self).fetch(query).await
    }

    async fn count(&self, query: &Query) -> Result<u64, RepositoryError> {
        (**self).count(query).await
    }
}
