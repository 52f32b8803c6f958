//! Incidents - reportable events involving a client

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{
    ClientId, DateRange, IncidentId, Page, PageRequest, Predicate, Record, RecordStatus,
    StatusFilter, UserId, Value,
};

use crate::criteria::lookup_key;
use crate::error::RepositoryError;
use crate::finder;
use crate::ports::RecordStore;

pub const CLIENT_ID: &str = "client_id";
pub const HOUSE_CODE: &str = "house_code";
pub const CATEGORY: &str = "category";
pub const SEVERITY: &str = "severity";
pub const STATE: &str = "state";
pub const OCCURRED_AT: &str = "occurred_at";
pub const DESCRIPTION: &str = "description";
pub const REPORTED_BY: &str = "reported_by";
pub const CREATED_AT: &str = "created_at";

text_enum! {
    IncidentCategory, "incident category" {
        Injury => "injury",
        Behaviour => "behaviour",
        Medication => "medication",
        Property => "property",
        Other => "other",
    }
}

text_enum! {
    Severity, "severity" {
        Low => "low",
        Medium => "medium",
        High => "high",
        Critical => "critical",
    }
}

text_enum! {
    /// Review workflow position of an incident report
    IncidentState, "incident state" {
        Reported => "reported",
        UnderReview => "under_review",
        Resolved => "resolved",
        Closed => "closed",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Incident {
    pub id: IncidentId,
    pub client_id: ClientId,
    pub house_code: String,
    pub category: IncidentCategory,
    pub severity: Severity,
    pub state: IncidentState,
    pub occurred_at: DateTime<Utc>,
    pub description: String,
    pub reported_by: Option<UserId>,
    pub status: RecordStatus,
    pub created_at: DateTime<Utc>,
}

impl Record for Incident {
    const ENTITY: &'static str = "Incident";
    const SORTABLE: &'static [&'static str] = &[OCCURRED_AT, CATEGORY, CREATED_AT];

    fn id(&self) -> i64 {
        self.id.value()
    }

    fn status(&self) -> RecordStatus {
        self.status
    }

    fn field(&self, column: &str) -> Value {
        match column {
            CLIENT_ID => self.client_id.into(),
            HOUSE_CODE => self.house_code.clone().into(),
            CATEGORY => self.category.into(),
            SEVERITY => self.severity.into(),
            STATE => self.state.into(),
            OCCURRED_AT => self.occurred_at.into(),
            DESCRIPTION => self.description.clone().into(),
            REPORTED_BY => self.reported_by.into(),
            CREATED_AT => self.created_at.into(),
            _ => Value::Null,
        }
    }
}

#[derive(Debug, Clone)]
pub struct IncidentRepository<S> {
    store: S,
}

impl<S: RecordStore<Incident>> IncidentRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn find_by_id(
        &self,
        id: IncidentId,
        status: StatusFilter,
    ) -> Result<Option<Incident>, RepositoryError> {
        finder::by_id(&self.store, id.value(), status).await
    }

    pub async fn list_for_client(
        &self,
        client_id: ClientId,
        status: StatusFilter,
        page: &PageRequest,
    ) -> Result<Page<Incident>, RepositoryError> {
        finder::page(&self.store, Predicate::eq(CLIENT_ID, client_id), status, page).await
    }

    pub async fn count_for_client(
        &self,
        client_id: ClientId,
        status: StatusFilter,
    ) -> Result<u64, RepositoryError> {
        finder::count(&self.store, Predicate::eq(CLIENT_ID, client_id), status).await
    }

    /// `house_code = ?1 AND occurred_at BETWEEN ?2 AND ?3`
    pub async fn list_for_house_between(
        &self,
        house_code: &str,
        range: DateRange<DateTime<Utc>>,
        status: StatusFilter,
        page: &PageRequest,
    ) -> Result<Page<Incident>, RepositoryError> {
        let filter = house_between(house_code, range)?;
        finder::page(&self.store, filter, status, page).await
    }

    pub async fn count_for_house_between(
        &self,
        house_code: &str,
        range: DateRange<DateTime<Utc>>,
        status: StatusFilter,
    ) -> Result<u64, RepositoryError> {
        let filter = house_between(house_code, range)?;
        finder::count(&self.store, filter, status).await
    }

    pub async fn list_by_state(
        &self,
        state: IncidentState,
        status: StatusFilter,
        page: &PageRequest,
    ) -> Result<Page<Incident>, RepositoryError> {
        finder::page(&self.store, Predicate::eq(STATE, state), status, page).await
    }

    pub async fn count_by_state(
        &self,
        state: IncidentState,
        status: StatusFilter,
    ) -> Result<u64, RepositoryError> {
        finder::count(&self.store, Predicate::eq(STATE, state), status).await
    }
}

fn house_between(
    house_code: &str,
    range: DateRange<DateTime<Utc>>,
) -> Result<Predicate, RepositoryError> {
    let house_code = lookup_key("house_code", house_code)?;
    Ok(Predicate::all(vec![
        Predicate::eq(HOUSE_CODE, house_code),
        range.predicate(OCCURRED_AT),
    ]))
}
