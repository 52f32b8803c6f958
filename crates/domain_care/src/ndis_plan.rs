//! NDIS plans - a client's funded support period
//!
//! A plan covers `[start_date, end_date)`. Plans for one client are expected
//! not to overlap; when they do, the current-plan lookup reports the overlap
//! instead of choosing one.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{
    ClientId, NdisPlanId, Page, PageRequest, Predicate, Record, RecordStatus, StatusFilter,
    ValidityWindow, Value,
};

use crate::criteria::lookup_key;
use crate::error::RepositoryError;
use crate::finder;
use crate::ports::RecordStore;

pub const CLIENT_ID: &str = "client_id";
pub const PLAN_NUMBER: &str = "plan_number";
pub const START_DATE: &str = "start_date";
pub const END_DATE: &str = "end_date";
pub const CREATED_AT: &str = "created_at";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NdisPlan {
    pub id: NdisPlanId,
    pub client_id: ClientId,
    pub plan_number: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_budget: Decimal,
    pub status: RecordStatus,
    pub created_at: DateTime<Utc>,
}

impl NdisPlan {
    pub fn window(&self) -> ValidityWindow<NaiveDate> {
        ValidityWindow {
            start: Some(self.start_date),
            end: Some(self.end_date),
        }
    }

    pub fn is_current_on(&self, date: NaiveDate) -> bool {
        self.window().covers(date)
    }
}

impl Record for NdisPlan {
    const ENTITY: &'static str = "NdisPlan";
    const SORTABLE: &'static [&'static str] = &[PLAN_NUMBER, START_DATE, END_DATE, CREATED_AT];

    fn id(&self) -> i64 {
        self.id.value()
    }

    fn status(&self) -> RecordStatus {
        self.status
    }

    fn field(&self, column: &str) -> Value {
        match column {
            CLIENT_ID => self.client_id.into(),
            PLAN_NUMBER => self.plan_number.clone().into(),
            START_DATE => self.start_date.into(),
            END_DATE => self.end_date.into(),
            CREATED_AT => self.created_at.into(),
            _ => Value::Null,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NdisPlanRepository<S> {
    store: S,
}

impl<S: RecordStore<NdisPlan>> NdisPlanRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn find_by_id(
        &self,
        id: NdisPlanId,
        status: StatusFilter,
    ) -> Result<Option<NdisPlan>, RepositoryError> {
        finder::by_id(&self.store, id.value(), status).await
    }

    /// `plan_number = ?1`
    pub async fn find_by_plan_number(
        &self,
        plan_number: &str,
        status: StatusFilter,
    ) -> Result<Option<NdisPlan>, RepositoryError> {
        let plan_number = lookup_key("plan_number", plan_number)?;
        finder::unique(&self.store, Predicate::eq(PLAN_NUMBER, plan_number), status).await
    }

    pub async fn list_for_client(
        &self,
        client_id: ClientId,
        status: StatusFilter,
        page: &PageRequest,
    ) -> Result<Page<NdisPlan>, RepositoryError> {
        finder::page(&self.store, Predicate::eq(CLIENT_ID, client_id), status, page).await
    }

    pub async fn count_for_client(
        &self,
        client_id: ClientId,
        status: StatusFilter,
    ) -> Result<u64, RepositoryError> {
        finder::count(&self.store, Predicate::eq(CLIENT_ID, client_id), status).await
    }

    /// The plan covering `on`: `client_id = ?1 AND start_date <= ?2 AND end_date > ?2`
    ///
    /// # Errors
    ///
    /// Returns `AmbiguousResult` when overlapping plans both cover the date.
    pub async fn find_current_for_client(
        &self,
        client_id: ClientId,
        on: NaiveDate,
        status: StatusFilter,
    ) -> Result<Option<NdisPlan>, RepositoryError> {
        let filter = Predicate::eq(CLIENT_ID, client_id)
            .and(ValidityWindow::covering(START_DATE, END_DATE, on));
        finder::unique(&self.store, filter, status).await
    }
}
