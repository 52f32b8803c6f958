//! Progress notes written about a client

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{
    ClientId, DateRange, NoteId, Page, PageRequest, Predicate, Record, RecordStatus, StatusFilter,
    UserId, Value,
};

use crate::error::RepositoryError;
use crate::finder;
use crate::ports::RecordStore;

pub const CLIENT_ID: &str = "client_id";
pub const AUTHOR_ID: &str = "author_id";
pub const NOTE_DATE: &str = "note_date";
pub const CATEGORY: &str = "category";
pub const CONTENT: &str = "content";
pub const CREATED_AT: &str = "created_at";

text_enum! {
    NoteCategory, "note category" {
        Daily => "daily",
        Progress => "progress",
        Medical => "medical",
        Behaviour => "behaviour",
        General => "general",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub client_id: ClientId,
    pub author_id: Option<UserId>,
    pub note_date: NaiveDate,
    pub category: NoteCategory,
    pub content: String,
    pub status: RecordStatus,
    pub created_at: DateTime<Utc>,
}

impl Record for Note {
    const ENTITY: &'static str = "Note";
    const SORTABLE: &'static [&'static str] = &[NOTE_DATE, CATEGORY, CREATED_AT];

    fn id(&self) -> i64 {
        self.id.value()
    }

    fn status(&self) -> RecordStatus {
        self.status
    }

    fn field(&self, column: &str) -> Value {
        match column {
            CLIENT_ID => self.client_id.into(),
            AUTHOR_ID => self.author_id.into(),
            NOTE_DATE => self.note_date.into(),
            CATEGORY => self.category.into(),
            CONTENT => self.content.clone().into(),
            CREATED_AT => self.created_at.into(),
            _ => Value::Null,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NoteRepository<S> {
    store: S,
}

impl<S: RecordStore<Note>> NoteRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn find_by_id(
        &self,
        id: NoteId,
        status: StatusFilter,
    ) -> Result<Option<Note>, RepositoryError> {
        finder::by_id(&self.store, id.value(), status).await
    }

    pub async fn list_for_client(
        &self,
        client_id: ClientId,
        status: StatusFilter,
        page: &PageRequest,
    ) -> Result<Page<Note>, RepositoryError> {
        finder::page(&self.store, Predicate::eq(CLIENT_ID, client_id), status, page).await
    }

    pub async fn count_for_client(
        &self,
        client_id: ClientId,
        status: StatusFilter,
    ) -> Result<u64, RepositoryError> {
        finder::count(&self.store, Predicate::eq(CLIENT_ID, client_id), status).await
    }

    /// `client_id = ?1 AND note_date BETWEEN ?2 AND ?3`
    pub async fn list_for_client_between(
        &self,
        client_id: ClientId,
        range: DateRange<NaiveDate>,
        status: StatusFilter,
        page: &PageRequest,
    ) -> Result<Page<Note>, RepositoryError> {
        finder::page(&self.store, client_between(client_id, range), status, page).await
    }

    pub async fn count_for_client_between(
        &self,
        client_id: ClientId,
        range: DateRange<NaiveDate>,
        status: StatusFilter,
    ) -> Result<u64, RepositoryError> {
        finder::count(&self.store, client_between(client_id, range), status).await
    }
}

fn client_between(client_id: ClientId, range: DateRange<NaiveDate>) -> Predicate {
    Predicate::all(vec![
        Predicate::eq(CLIENT_ID, client_id),
        range.predicate(NOTE_DATE),
    ])
}
