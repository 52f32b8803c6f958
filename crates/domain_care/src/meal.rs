//! Meal records - what a client ate, one record per meal per day

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{
    ClientId, DateRange, MealRecordId, Page, PageRequest, Predicate, Record, RecordStatus,
    StatusFilter, UserId, Value,
};

use crate::error::RepositoryError;
use crate::finder;
use crate::ports::RecordStore;

pub const CLIENT_ID: &str = "client_id";
pub const MEAL_TYPE: &str = "meal_type";
pub const MEAL_DATE: &str = "meal_date";
pub const DETAILS: &str = "details";
pub const RECORDED_BY: &str = "recorded_by";
pub const CREATED_AT: &str = "created_at";

text_enum! {
    MealType, "meal type" {
        Breakfast => "breakfast",
        Lunch => "lunch",
        Dinner => "dinner",
        Snack => "snack",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealRecord {
    pub id: MealRecordId,
    pub client_id: ClientId,
    pub meal_type: MealType,
    pub meal_date: NaiveDate,
    pub details: Option<String>,
    pub recorded_by: Option<UserId>,
    pub status: RecordStatus,
    pub created_at: DateTime<Utc>,
}

impl Record for MealRecord {
    const ENTITY: &'static str = "MealRecord";
    const SORTABLE: &'static [&'static str] = &[MEAL_DATE, MEAL_TYPE, CREATED_AT];

    fn id(&self) -> i64 {
        self.id.value()
    }

    fn status(&self) -> RecordStatus {
        self.status
    }

    fn field(&self, column: &str) -> Value {
        match column {
            CLIENT_ID => self.client_id.into(),
            MEAL_TYPE => self.meal_type.into(),
            MEAL_DATE => self.meal_date.into(),
            DETAILS => self.details.clone().into(),
            RECORDED_BY => self.recorded_by.into(),
            CREATED_AT => self.created_at.into(),
            _ => Value::Null,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MealRecordRepository<S> {
    store: S,
}

impl<S: RecordStore<MealRecord>> MealRecordRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn find_by_id(
        &self,
        id: MealRecordId,
        status: StatusFilter,
    ) -> Result<Option<MealRecord>, RepositoryError> {
        finder::by_id(&self.store, id.value(), status).await
    }

    /// `client_id = ?1 AND meal_type = ?2 AND meal_date = ?3`
    ///
    /// # Errors
    ///
    /// Returns `AmbiguousResult` when the same meal was recorded twice.
    pub async fn find_by_client_meal_and_date(
        &self,
        client_id: ClientId,
        meal_type: MealType,
        date: NaiveDate,
        status: StatusFilter,
    ) -> Result<Option<MealRecord>, RepositoryError> {
        let filter = Predicate::all(vec![
            Predicate::eq(CLIENT_ID, client_id),
            Predicate::eq(MEAL_TYPE, meal_type),
            Predicate::eq(MEAL_DATE, date),
        ]);
        finder::unique(&self.store, filter, status).await
    }

    /// `client_id = ?1 AND meal_date BETWEEN ?2 AND ?3`
    pub async fn list_for_client_between(
        &self,
        client_id: ClientId,
        range: DateRange<NaiveDate>,
        status: StatusFilter,
        page: &PageRequest,
    ) -> Result<Page<MealRecord>, RepositoryError> {
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
        range.predicate(MEAL_DATE),
    ])
}
