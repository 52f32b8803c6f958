//! Clients - the people receiving care
//!
//! Clients belong to a house. The house code is carried on the client row so
//! the name/house-code search runs without a join.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{
    ClientId, HouseId, Page, PageRequest, Predicate, Record, RecordStatus, StatusFilter, Value,
};

use crate::criteria::{lookup_key, search_term};
use crate::error::RepositoryError;
use crate::finder;
use crate::ports::RecordStore;

pub const NAME: &str = "name";
pub const HOUSE_ID: &str = "house_id";
pub const HOUSE_CODE: &str = "house_code";
pub const DATE_OF_BIRTH: &str = "date_of_birth";
pub const NDIS_NUMBER: &str = "ndis_number";
pub const CREATED_AT: &str = "created_at";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    pub house_id: HouseId,
    pub house_code: String,
    pub date_of_birth: Option<NaiveDate>,
    pub ndis_number: Option<String>,
    pub status: RecordStatus,
    pub created_at: DateTime<Utc>,
}

impl Record for Client {
    const ENTITY: &'static str = "Client";
    const SORTABLE: &'static [&'static str] = &[NAME, HOUSE_CODE, DATE_OF_BIRTH, CREATED_AT];

    fn id(&self) -> i64 {
        self.id.value()
    }

    fn status(&self) -> RecordStatus {
        self.status
    }

    fn field(&self, column: &str) -> Value {
        match column {
            NAME => self.name.clone().into(),
            HOUSE_ID => self.house_id.into(),
            HOUSE_CODE => self.house_code.clone().into(),
            DATE_OF_BIRTH => self.date_of_birth.into(),
            NDIS_NUMBER => self.ndis_number.clone().into(),
            CREATED_AT => self.created_at.into(),
            _ => Value::Null,
        }
    }
}

/// Finder operations over clients
#[derive(Debug, Clone)]
pub struct ClientRepository<S> {
    store: S,
}

impl<S: RecordStore<Client>> ClientRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn find_by_id(
        &self,
        id: ClientId,
        status: StatusFilter,
    ) -> Result<Option<Client>, RepositoryError> {
        finder::by_id(&self.store, id.value(), status).await
    }

    pub async fn count(&self, status: StatusFilter) -> Result<u64, RepositoryError> {
        finder::count(&self.store, Predicate::Always, status).await
    }

    /// Looks up a client by NDIS participant number: `ndis_number = ?1`
    ///
    /// # Errors
    ///
    /// Returns `AmbiguousResult` if the number is shared by several clients.
    pub async fn find_by_ndis_number(
        &self,
        number: &str,
        status: StatusFilter,
    ) -> Result<Option<Client>, RepositoryError> {
        let number = lookup_key("ndis_number", number)?;
        finder::unique(&self.store, Predicate::eq(NDIS_NUMBER, number), status).await
    }

    /// `(name CONTAINS ?1 OR house_code CONTAINS ?2) AND record_status = ?3`
    ///
    /// A client matching the name is returned even when its house code does
    /// not match, and vice versa; the status clause applies to both.
    pub async fn search_by_name_or_house_code(
        &self,
        name: &str,
        house_code: &str,
        status: StatusFilter,
        page: &PageRequest,
    ) -> Result<Page<Client>, RepositoryError> {
        let filter = name_or_house_code(name, house_code)?;
        finder::page(&self.store, filter, status, page).await
    }

    pub async fn count_by_name_or_house_code(
        &self,
        name: &str,
        house_code: &str,
        status: StatusFilter,
    ) -> Result<u64, RepositoryError> {
        let filter = name_or_house_code(name, house_code)?;
        finder::count(&self.store, filter, status).await
    }

    pub async fn list_by_house(
        &self,
        house_id: HouseId,
        status: StatusFilter,
        page: &PageRequest,
    ) -> Result<Page<Client>, RepositoryError> {
        finder::page(&self.store, Predicate::eq(HOUSE_ID, house_id), status, page).await
    }

    pub async fn count_by_house(
        &self,
        house_id: HouseId,
        status: StatusFilter,
    ) -> Result<u64, RepositoryError> {
        finder::count(&self.store, Predicate::eq(HOUSE_ID, house_id), status).await
    }
}

/// Builds the name-or-house-code filter shared by the list and count finders
pub fn name_or_house_code(name: &str, house_code: &str) -> Result<Predicate, RepositoryError> {
    Ok(Predicate::any(vec![
        Predicate::contains(NAME, search_term("name", name)?),
        Predicate::contains(HOUSE_CODE, search_term("house_code", house_code)?),
    ]))
}
