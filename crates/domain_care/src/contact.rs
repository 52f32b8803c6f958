//! Contacts - family, guardians and other people linked to a client

use serde::{Deserialize, Serialize};

use core_kernel::{ClientId, ContactId, Page, PageRequest, Predicate, Record, RecordStatus, StatusFilter, Value};

use crate::error::RepositoryError;
use crate::finder;
use crate::ports::RecordStore;

pub const CLIENT_ID: &str = "client_id";
pub const NAME: &str = "name";
pub const RELATIONSHIP: &str = "relationship";
pub const PHONE: &str = "phone";
pub const EMAIL: &str = "email";
pub const EMERGENCY: &str = "emergency";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub client_id: ClientId,
    pub name: String,
    pub relationship: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub emergency: bool,
    pub status: RecordStatus,
}

impl Record for Contact {
    const ENTITY: &'static str = "Contact";
    const SORTABLE: &'static [&'static str] = &[NAME, RELATIONSHIP];

    fn id(&self) -> i64 {
        self.id.value()
    }

    fn status(&self) -> RecordStatus {
        self.status
    }

    fn field(&self, column: &str) -> Value {
        match column {
            CLIENT_ID => self.client_id.into(),
            NAME => self.name.clone().into(),
            RELATIONSHIP => self.relationship.clone().into(),
            PHONE => self.phone.clone().into(),
            EMAIL => self.email.clone().into(),
            EMERGENCY => self.emergency.into(),
            _ => Value::Null,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ContactRepository<S> {
    store: S,
}

impl<S: RecordStore<Contact>> ContactRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn find_by_id(
        &self,
        id: ContactId,
        status: StatusFilter,
    ) -> Result<Option<Contact>, RepositoryError> {
        finder::by_id(&self.store, id.value(), status).await
    }

    pub async fn list_for_client(
        &self,
        client_id: ClientId,
        status: StatusFilter,
        page: &PageRequest,
    ) -> Result<Page<Contact>, RepositoryError> {
        finder::page(&self.store, Predicate::eq(CLIENT_ID, client_id), status, page).await
    }

    pub async fn count_for_client(
        &self,
        client_id: ClientId,
        status: StatusFilter,
    ) -> Result<u64, RepositoryError> {
        finder::count(&self.store, Predicate::eq(CLIENT_ID, client_id), status).await
    }

    /// `client_id = ?1 AND emergency = TRUE`, unpaged
    pub async fn list_emergency_for_client(
        &self,
        client_id: ClientId,
        status: StatusFilter,
    ) -> Result<Vec<Contact>, RepositoryError> {
        let filter = Predicate::all(vec![
            Predicate::eq(CLIENT_ID, client_id),
            Predicate::eq(EMERGENCY, true),
        ]);
        finder::all(&self.store, filter, status).await
    }
}
