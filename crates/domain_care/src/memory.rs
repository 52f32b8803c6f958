//! In-memory record store
//!
//! Evaluates queries with [`Query::evaluate`], the same predicate tree the
//! PostgreSQL adapter renders to SQL. Used by tests and fixtures; it can also
//! simulate an unreachable database.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{RwLock, RwLockReadGuard};

use core_kernel::{Query, Record};

use crate::error::RepositoryError;
use crate::ports::RecordStore;

/// A `RecordStore` backed by a vector
#[derive(Debug)]
pub struct MemoryStore<R> {
    rows: RwLock<Vec<R>>,
    offline: AtomicBool,
    calls: AtomicUsize,
}

impl<R: Record> Default for MemoryStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> MemoryStore<R> {
    pub fn new() -> Self {
        Self::with_rows(Vec::new())
    }

    pub fn with_rows(rows: Vec<R>) -> Self {
        Self {
            rows: RwLock::new(rows),
            offline: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        }
    }

    /// Appends a row; insertion order is the default result order
    pub fn insert(&self, row: R) {
        self.rows
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(row);
    }

    pub fn len(&self) -> usize {
        self.rows().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Makes every subsequent call fail as if the database were down
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of fetch and count calls served so far, failed ones included
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    // A panicking writer can only have left a fully pushed row behind, so a
    // poisoned lock still guards consistent data.
    fn rows(&self) -> RwLockReadGuard<'_, Vec<R>> {
        self.rows
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn guard(&self) -> Result<(), RepositoryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.offline.load(Ordering::SeqCst) {
            return Err(RepositoryError::Unavailable(
                "in-memory store is offline".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl<R: Record> RecordStore<R> for MemoryStore<R> {
    async fn fetch(&self, query: &Query) -> Result<Vec<R>, RepositoryError> {
        self.guard()?;
        Ok(query.evaluate(self.rows().iter()))
    }

    async fn count(&self, query: &Query) -> Result<u64, RepositoryError> {
        self.guard()?;
        Ok(query.count(self.rows().iter()))
    }
}
