//! Client documents - care plans, consents, reports and the like
//!
//! Only metadata lives in this table; file contents are stored elsewhere
//! under `file_name`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{
    ClientId, DateRange, DocumentId, Page, PageRequest, Predicate, Record, RecordStatus,
    StatusFilter, UserId, Value,
};

use crate::error::RepositoryError;
use crate::finder;
use crate::ports::RecordStore;

pub const CLIENT_ID: &str = "client_id";
pub const CATEGORY: &str = "category";
pub const TITLE: &str = "title";
pub const FILE_NAME: &str = "file_name";
pub const EXPIRY_DATE: &str = "expiry_date";
pub const UPLOADED_BY: &str = "uploaded_by";
pub const CREATED_AT: &str = "created_at";

text_enum! {
    DocumentCategory, "document category" {
        CarePlan => "care_plan",
        Medical => "medical",
        Consent => "consent",
        Identification => "identification",
        Report => "report",
        Other => "other",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub client_id: ClientId,
    pub category: DocumentCategory,
    pub title: String,
    pub file_name: String,
    pub expiry_date: Option<NaiveDate>,
    pub uploaded_by: Option<UserId>,
    pub status: RecordStatus,
    pub created_at: DateTime<Utc>,
}

impl Record for Document {
    const ENTITY: &'static str = "Document";
    const SORTABLE: &'static [&'static str] = &[TITLE, EXPIRY_DATE, CREATED_AT];

    fn id(&self) -> i64 {
        self.id.value()
    }

    fn status(&self) -> RecordStatus {
        self.status
    }

    fn field(&self, column: &str) -> Value {
        match column {
            CLIENT_ID => self.client_id.into(),
            CATEGORY => self.category.into(),
            TITLE => self.title.clone().into(),
            FILE_NAME => self.file_name.clone().into(),
            EXPIRY_DATE => self.expiry_date.into(),
            UPLOADED_BY => self.uploaded_by.into(),
            CREATED_AT => self.created_at.into(),
            _ => Value::Null,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DocumentRepository<S> {
    store: S,
}

impl<S: RecordStore<Document>> DocumentRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn find_by_id(
        &self,
        id: DocumentId,
        status: StatusFilter,
    ) -> Result<Option<Document>, RepositoryError> {
        finder::by_id(&self.store, id.value(), status).await
    }

    /// `client_id = ?1 [AND category = ?2]`
    pub async fn list_for_client(
        &self,
        client_id: ClientId,
        category: Option<DocumentCategory>,
        status: StatusFilter,
        page: &PageRequest,
    ) -> Result<Page<Document>, RepositoryError> {
        finder::page(&self.store, for_client(client_id, category), status, page).await
    }

    pub async fn count_for_client(
        &self,
        client_id: ClientId,
        category: Option<DocumentCategory>,
        status: StatusFilter,
    ) -> Result<u64, RepositoryError> {
        finder::count(&self.store, for_client(client_id, category), status).await
    }

    /// `expiry_date BETWEEN ?1 AND ?2`; documents without an expiry never match
    pub async fn list_expiring_between(
        &self,
        range: DateRange<NaiveDate>,
        status: StatusFilter,
        page: &PageRequest,
    ) -> Result<Page<Document>, RepositoryError> {
        finder::page(&self.store, range.predicate(EXPIRY_DATE), status, page).await
    }

    pub async fn count_expiring_between(
        &self,
        range: DateRange<NaiveDate>,
        status: StatusFilter,
    ) -> Result<u64, RepositoryError> {
        finder::count(&self.store, range.predicate(EXPIRY_DATE), status).await
    }
}

fn for_client(client_id: ClientId, category: Option<DocumentCategory>) -> Predicate {
    let by_client = Predicate::eq(CLIENT_ID, client_id);
    match category {
        Some(category) => by_client.and(Predicate::eq(CATEGORY, category)),
        None => by_client,
    }
}
