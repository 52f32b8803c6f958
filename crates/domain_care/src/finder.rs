//! Shared finder plumbing
//!
//! Every named repository operation reduces to one of these shapes: a page
//! plus its count twin, a bare count, an unpaged list, or a zero-or-one
//! lookup.

use tracing::{debug, warn};

use core_kernel::query::ID_COLUMN;
use core_kernel::{Page, PageRequest, Predicate, Query, Record, StatusFilter};

use crate::error::RepositoryError;
use crate::ports::RecordStore;

/// Fetches one page and the total from the same query value
pub(crate) async fn page<R, S>(
    store: &S,
    filter: Predicate,
    status: StatusFilter,
    request: &PageRequest,
) -> Result<Page<R>, RepositoryError>
where
    R: Record,
    S: RecordStore<R> + ?Sized,
{
    let query = Query::new(filter).with_status(status).paged::<R>(request)?;
    let items = store.fetch(&query).await?;
    let total = store.count(&query).await?;
    debug!(
        entity = R::ENTITY,
        page = request.page,
        returned = items.len(),
        total,
        "Fetched page"
    );
    Ok(Page::new(items, request, total))
}

pub(crate) async fn count<R, S>(
    store: &S,
    filter: Predicate,
    status: StatusFilter,
) -> Result<u64, RepositoryError>
where
    R: Record,
    S: RecordStore<R> + ?Sized,
{
    let query = Query::new(filter).with_status(status);
    store.count(&query).await
}

/// Every matching row in insertion order
pub(crate) async fn all<R, S>(
    store: &S,
    filter: Predicate,
    status: StatusFilter,
) -> Result<Vec<R>, RepositoryError>
where
    R: Record,
    S: RecordStore<R> + ?Sized,
{
    let query = Query::new(filter).with_status(status);
    store.fetch(&query).await
}

/// Zero-or-one lookup
///
/// Fetches at most two rows. A second row means the key was not unique in
/// storage; the full match count is reported in `AmbiguousResult` instead of
/// picking one arbitrarily.
pub(crate) async fn unique<R, S>(
    store: &S,
    filter: Predicate,
    status: StatusFilter,
) -> Result<Option<R>, RepositoryError>
where
    R: Record,
    S: RecordStore<R> + ?Sized,
{
    let query = Query::new(filter).with_status(status).limit(2);
    let mut rows = store.fetch(&query).await?;
    if rows.len() > 1 {
        let matches = store.count(&query).await?;
        warn!(entity = R::ENTITY, matches, "Exact-match lookup is ambiguous");
        return Err(RepositoryError::AmbiguousResult {
            entity: R::ENTITY,
            matches,
        });
    }
    Ok(rows.pop())
}

pub(crate) async fn by_id<R, S>(
    store: &S,
    id: i64,
    status: StatusFilter,
) -> Result<Option<R>, RepositoryError>
where
    R: Record,
    S: RecordStore<R> + ?Sized,
{
    unique(store, Predicate::eq(ID_COLUMN, id), status).await
}
