//! Houses - the residences clients live in and staff are rostered to

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{HouseId, Page, PageRequest, Predicate, Record, RecordStatus, StatusFilter, Value};

use crate::criteria::{lookup_key, search_term};
use crate::error::RepositoryError;
use crate::finder;
use crate::ports::RecordStore;

pub const HOUSE_CODE: &str = "house_code";
pub const NAME: &str = "name";
pub const ADDRESS: &str = "address";
pub const PHONE: &str = "phone";
pub const CREATED_AT: &str = "created_at";

/// A residence, identified to staff by its house code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct House {
    pub id: HouseId,
    pub house_code: String,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub status: RecordStatus,
    pub created_at: DateTime<Utc>,
}

impl Record for House {
    const ENTITY: &'static str = "House";
    const SORTABLE: &'static [&'static str] = &[HOUSE_CODE, NAME, CREATED_AT];

    fn id(&self) -> i64 {
        self.id.value()
    }

    fn status(&self) -> RecordStatus {
        self.status
    }

    fn field(&self, column: &str) -> Value {
        match column {
            HOUSE_CODE => self.house_code.clone().into(),
            NAME => self.name.clone().into(),
            ADDRESS => self.address.clone().into(),
            PHONE => self.phone.clone().into(),
            CREATED_AT => self.created_at.into(),
            _ => Value::Null,
        }
    }
}

/// Finder operations over houses
#[derive(Debug, Clone)]
pub struct HouseRepository<S> {
    store: S,
}

impl<S: RecordStore<House>> HouseRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn find_by_id(
        &self,
        id: HouseId,
        status: StatusFilter,
    ) -> Result<Option<House>, RepositoryError> {
        finder::by_id(&self.store, id.value(), status).await
    }

    /// Looks up a house by its code: `house_code = ?1`
    ///
    /// # Errors
    ///
    /// Returns `AmbiguousResult` if more than one house carries the code.
    pub async fn find_by_code(
        &self,
        code: &str,
        status: StatusFilter,
    ) -> Result<Option<House>, RepositoryError> {
        let code = lookup_key("house_code", code)?;
        finder::unique(&self.store, Predicate::eq(HOUSE_CODE, code), status).await
    }

    pub async fn list(
        &self,
        status: StatusFilter,
        page: &PageRequest,
    ) -> Result<Page<House>, RepositoryError> {
        finder::page(&self.store, Predicate::Always, status, page).await
    }

    pub async fn count(&self, status: StatusFilter) -> Result<u64, RepositoryError> {
        finder::count(&self.store, Predicate::Always, status).await
    }

    /// `(name CONTAINS ?1 OR house_code CONTAINS ?1)`, case-insensitive
    pub async fn search(
        &self,
        text: &str,
        status: StatusFilter,
        page: &PageRequest,
    ) -> Result<Page<House>, RepositoryError> {
        finder::page(&self.store, search_filter(text)?, status, page).await
    }

    pub async fn count_search(
        &self,
        text: &str,
        status: StatusFilter,
    ) -> Result<u64, RepositoryError> {
        finder::count(&self.store, search_filter(text)?, status).await
    }
}

fn search_filter(text: &str) -> Result<Predicate, RepositoryError> {
    let text = search_term("text", text)?;
    Ok(Predicate::any(vec![
        Predicate::contains(NAME, text.clone()),
        Predicate::contains(HOUSE_CODE, text),
    ]))
}
