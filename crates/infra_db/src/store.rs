//! PostgreSQL record store

use async_trait::async_trait;
use std::fmt;
use std::marker::PhantomData;
use tracing::debug;

use core_kernel::Query;
use domain_care::{RecordStore, RepositoryError};

use crate::error::DatabaseError;
use crate::pool::DatabasePool;
use crate::sql;
use crate::tables::Table;

/// Runs finder queries for one record type against a connection pool
///
/// Read-only: every statement is a single `SELECT` with bound parameters,
/// and failures are reported once without retrying.
pub struct PgRecordStore<R> {
    pool: DatabasePool,
    _record: PhantomData<fn() -> R>,
}

impl<R> PgRecordStore<R> {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            pool,
            _record: PhantomData,
        }
    }

    pub fn pool(&self) -> &DatabasePool {
        &self.pool
    }
}

impl<R> Clone for PgRecordStore<R> {
    fn clone(&self) -> Self {
        Self::new(self.pool.clone())
    }
}

impl<R> fmt::Debug for PgRecordStore<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgRecordStore")
            .field("record", &std::any::type_name::<R>())
            .finish()
    }
}

#[async_trait]
impl<R: Table> RecordStore<R> for PgRecordStore<R> {
    async fn fetch(&self, query: &Query) -> Result<Vec<R>, RepositoryError> {
        let mut builder = sql::select(R::TABLE, R::COLUMNS, query);
        debug!(entity = R::ENTITY, sql = builder.sql(), "Fetching rows");

        let rows = builder
            .build_query_as::<R::Row>()
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::from)?;

        let records = rows
            .into_iter()
            .map(R::from_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    async fn count(&self, query: &Query) -> Result<u64, RepositoryError> {
        let mut builder = sql::count(R::TABLE, query);
        debug!(entity = R::ENTITY, sql = builder.sql(), "Counting rows");

        let total: i64 = builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(DatabaseError::from)?;
        Ok(u64::try_from(total).unwrap_or(0))
    }
}
