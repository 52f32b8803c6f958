//! Notices - announcements shown to staff in one or more houses
//!
//! A notice is linked to houses through the `notice_houses` join table and is
//! shown while its `[start_at, end_at)` window covers the current time. A
//! notice without a start time is already showing; one without an end time
//! never expires.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{
    HouseId, NoticeId, Page, PageRequest, Predicate, Record, RecordStatus, Relation, StatusFilter,
    UserId, ValidityWindow, Value,
};

use crate::error::RepositoryError;
use crate::finder;
use crate::ports::RecordStore;

pub const TITLE: &str = "title";
pub const BODY: &str = "body";
pub const STATE: &str = "state";
pub const START_AT: &str = "start_at";
pub const END_AT: &str = "end_at";
pub const CREATED_BY: &str = "created_by";
pub const CREATED_AT: &str = "created_at";

/// Houses a notice is posted to
pub static NOTICE_HOUSES: Relation = Relation {
    name: "houses",
    join_table: "notice_houses",
    owner_column: "notice_id",
    member_column: "house_id",
};

text_enum! {
    NoticeState, "notice state" {
        Draft => "draft",
        Active => "active",
        Archived => "archived",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub id: NoticeId,
    pub title: String,
    pub body: String,
    pub state: NoticeState,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    pub house_ids: Vec<HouseId>,
    pub created_by: Option<UserId>,
    pub status: RecordStatus,
    pub created_at: DateTime<Utc>,
}

impl Notice {
    pub fn window(&self) -> ValidityWindow<DateTime<Utc>> {
        ValidityWindow {
            start: self.start_at,
            end: self.end_at,
        }
    }

    pub fn is_posted_to(&self, house_id: HouseId) -> bool {
        self.house_ids.contains(&house_id)
    }
}

impl Record for Notice {
    const ENTITY: &'static str = "Notice";
    const SORTABLE: &'static [&'static str] = &[TITLE, START_AT, END_AT, CREATED_AT];

    fn id(&self) -> i64 {
        self.id.value()
    }

    fn status(&self) -> RecordStatus {
        self.status
    }

    fn field(&self, column: &str) -> Value {
        match column {
            TITLE => self.title.clone().into(),
            BODY => self.body.clone().into(),
            STATE => self.state.into(),
            START_AT => self.start_at.into(),
            END_AT => self.end_at.into(),
            CREATED_BY => self.created_by.into(),
            CREATED_AT => self.created_at.into(),
            _ => Value::Null,
        }
    }

    fn related(&self, relation: &str) -> Vec<i64> {
        if relation == NOTICE_HOUSES.name {
            self.house_ids.iter().map(|id| id.value()).collect()
        } else {
            Vec::new()
        }
    }
}

#[derive(Debug, Clone)]
pub struct NoticeRepository<S> {
    store: S,
}

impl<S: RecordStore<Notice>> NoticeRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn find_by_id(
        &self,
        id: NoticeId,
        status: StatusFilter,
    ) -> Result<Option<Notice>, RepositoryError> {
        finder::by_id(&self.store, id.value(), status).await
    }

    /// Notices showing in a house at `now`
    ///
    /// ```text
    /// state = ?1
    ///   AND ?2 IN (houses)
    ///   AND (start_at IS NULL OR start_at <= ?3)
    ///   AND (end_at IS NULL OR end_at > ?3)
    /// ```
    pub async fn find_active_for_house(
        &self,
        state: NoticeState,
        house_id: HouseId,
        now: DateTime<Utc>,
        status: StatusFilter,
        page: &PageRequest,
    ) -> Result<Page<Notice>, RepositoryError> {
        finder::page(&self.store, showing_in(state, house_id, now), status, page).await
    }

    pub async fn count_active_for_house(
        &self,
        state: NoticeState,
        house_id: HouseId,
        now: DateTime<Utc>,
        status: StatusFilter,
    ) -> Result<u64, RepositoryError> {
        finder::count(&self.store, showing_in(state, house_id, now), status).await
    }

    pub async fn list_by_state(
        &self,
        state: NoticeState,
        status: StatusFilter,
        page: &PageRequest,
    ) -> Result<Page<Notice>, RepositoryError> {
        finder::page(&self.store, Predicate::eq(STATE, state), status, page).await
    }

    pub async fn count_by_state(
        &self,
        state: NoticeState,
        status: StatusFilter,
    ) -> Result<u64, RepositoryError> {
        finder::count(&self.store, Predicate::eq(STATE, state), status).await
    }
}

/// The membership-and-window filter behind the house notice board
pub fn showing_in(state: NoticeState, house_id: HouseId, now: DateTime<Utc>) -> Predicate {
    Predicate::all(vec![
        Predicate::eq(STATE, state),
        Predicate::member_of(&NOTICE_HOUSES, house_id),
    ])
    .and(ValidityWindow::covering(START_AT, END_AT, now))
}
