//! Table mappings for the care records
//!
//! Each record type names its table and select list and converts a fetched
//! row into the domain value. Enumerations and the lifecycle status are
//! stored as lowercase text and parsed on the way out; an unknown spelling
//! is a mapping error rather than a silent default.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::FromRow;
use std::fmt::Display;
use std::str::FromStr;

use core_kernel::{
    ClientId, ContactId, DocumentId, HouseId, IncidentId, MealRecordId, NdisPlanId, NoteId,
    NoticeId, Record, RecordStatus, UserId,
};
use domain_care::{
    Client, Contact, Document, House, Incident, MealRecord, NdisPlan, Note, Notice, User,
};

use crate::error::DatabaseError;

/// A record type stored in one PostgreSQL table
pub trait Table: Record {
    type Row: for<'r> FromRow<'r, PgRow> + Send + Unpin;

    const TABLE: &'static str;

    /// Select list, in the order the row type expects
    const COLUMNS: &'static str;

    fn from_row(row: Self::Row) -> Result<Self, DatabaseError>;
}

fn parse<T>(entity: &'static str, raw: &str) -> Result<T, DatabaseError>
where
    T: FromStr,
    T::Err: Display,
{
    raw.parse().map_err(|e| DatabaseError::mapping(entity, e))
}

#[derive(Debug, FromRow)]
pub struct HouseRow {
    pub id: i64,
    pub house_code: String,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub record_status: String,
    pub created_at: DateTime<Utc>,
}

impl Table for House {
    type Row = HouseRow;
    const TABLE: &'static str = "houses";
    const COLUMNS: &'static str = "id, house_code, name, address, phone, record_status, created_at";

    fn from_row(row: HouseRow) -> Result<Self, DatabaseError> {
        Ok(House {
            id: HouseId::new(row.id),
            house_code: row.house_code,
            name: row.name,
            address: row.address,
            phone: row.phone,
            status: parse::<RecordStatus>(Self::ENTITY, &row.record_status)?,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
pub struct ClientRow {
    pub id: i64,
    pub name: String,
    pub house_id: i64,
    pub house_code: String,
    pub date_of_birth: Option<NaiveDate>,
    pub ndis_number: Option<String>,
    pub record_status: String,
    pub created_at: DateTime<Utc>,
}

impl Table for Client {
    type Row = ClientRow;
    const TABLE: &'static str = "clients";
    const COLUMNS: &'static str =
        "id, name, house_id, house_code, date_of_birth, ndis_number, record_status, created_at";

    fn from_row(row: ClientRow) -> Result<Self, DatabaseError> {
        Ok(Client {
            id: ClientId::new(row.id),
            name: row.name,
            house_id: HouseId::new(row.house_id),
            house_code: row.house_code,
            date_of_birth: row.date_of_birth,
            ndis_number: row.ndis_number,
            status: parse(Self::ENTITY, &row.record_status)?,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
pub struct UserRow {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: String,
    pub house_id: Option<i64>,
    pub house_code: Option<String>,
    pub record_status: String,
    pub created_at: DateTime<Utc>,
}

impl Table for User {
    type Row = UserRow;
    const TABLE: &'static str = "users";
    const COLUMNS: &'static str =
        "id, first_name, last_name, email, role, house_id, house_code, record_status, created_at";

    fn from_row(row: UserRow) -> Result<Self, DatabaseError> {
        Ok(User {
            id: UserId::new(row.id),
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            role: parse(Self::ENTITY, &row.role)?,
            house_id: row.house_id.map(HouseId::new),
            house_code: row.house_code,
            status: parse(Self::ENTITY, &row.record_status)?,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
pub struct IncidentRow {
    pub id: i64,
    pub client_id: i64,
    pub house_code: String,
    pub category: String,
    pub severity: String,
    pub state: String,
    pub occurred_at: DateTime<Utc>,
    pub description: String,
    pub reported_by: Option<i64>,
    pub record_status: String,
    pub created_at: DateTime<Utc>,
}

impl Table for Incident {
    type Row = IncidentRow;
    const TABLE: &'static str = "incidents";
    const COLUMNS: &'static str = "id, client_id, house_code, category, severity, state, \
        occurred_at, description, reported_by, record_status, created_at";

    fn from_row(row: IncidentRow) -> Result<Self, DatabaseError> {
        Ok(Incident {
            id: IncidentId::new(row.id),
            client_id: ClientId::new(row.client_id),
            house_code: row.house_code,
            category: parse(Self::ENTITY, &row.category)?,
            severity: parse(Self::ENTITY, &row.severity)?,
            state: parse(Self::ENTITY, &row.state)?,
            occurred_at: row.occurred_at,
            description: row.description,
            reported_by: row.reported_by.map(UserId::new),
            status: parse(Self::ENTITY, &row.record_status)?,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
pub struct NoteRow {
    pub id: i64,
    pub client_id: i64,
    pub author_id: Option<i64>,
    pub note_date: NaiveDate,
    pub category: String,
    pub content: String,
    pub record_status: String,
    pub created_at: DateTime<Utc>,
}

impl Table for Note {
    type Row = NoteRow;
    const TABLE: &'static str = "notes";
    const COLUMNS: &'static str =
        "id, client_id, author_id, note_date, category, content, record_status, created_at";

    fn from_row(row: NoteRow) -> Result<Self, DatabaseError> {
        Ok(Note {
            id: NoteId::new(row.id),
            client_id: ClientId::new(row.client_id),
            author_id: row.author_id.map(UserId::new),
            note_date: row.note_date,
            category: parse(Self::ENTITY, &row.category)?,
            content: row.content,
            status: parse(Self::ENTITY, &row.record_status)?,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
pub struct DocumentRow {
    pub id: i64,
    pub client_id: i64,
    pub category: String,
    pub title: String,
    pub file_name: String,
    pub expiry_date: Option<NaiveDate>,
    pub uploaded_by: Option<i64>,
    pub record_status: String,
    pub created_at: DateTime<Utc>,
}

impl Table for Document {
    type Row = DocumentRow;
    const TABLE: &'static str = "documents";
    const COLUMNS: &'static str = "id, client_id, category, title, file_name, expiry_date, \
        uploaded_by, record_status, created_at";

    fn from_row(row: DocumentRow) -> Result<Self, DatabaseError> {
        Ok(Document {
            id: DocumentId::new(row.id),
            client_id: ClientId::new(row.client_id),
            category: parse(Self::ENTITY, &row.category)?,
            title: row.title,
            file_name: row.file_name,
            expiry_date: row.expiry_date,
            uploaded_by: row.uploaded_by.map(UserId::new),
            status: parse(Self::ENTITY, &row.record_status)?,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
pub struct ContactRow {
    pub id: i64,
    pub client_id: i64,
    pub name: String,
    pub relationship: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub emergency: bool,
    pub record_status: String,
}

impl Table for Contact {
    type Row = ContactRow;
    const TABLE: &'static str = "contacts";
    const COLUMNS: &'static str =
        "id, client_id, name, relationship, phone, email, emergency, record_status";

    fn from_row(row: ContactRow) -> Result<Self, DatabaseError> {
        Ok(Contact {
            id: ContactId::new(row.id),
            client_id: ClientId::new(row.client_id),
            name: row.name,
            relationship: row.relationship,
            phone: row.phone,
            email: row.email,
            emergency: row.emergency,
            status: parse(Self::ENTITY, &row.record_status)?,
        })
    }
}

#[derive(Debug, FromRow)]
pub struct NdisPlanRow {
    pub id: i64,
    pub client_id: i64,
    pub plan_number: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_budget: Decimal,
    pub record_status: String,
    pub created_at: DateTime<Utc>,
}

impl Table for NdisPlan {
    type Row = NdisPlanRow;
    const TABLE: &'static str = "ndis_plans";
    const COLUMNS: &'static str = "id, client_id, plan_number, start_date, end_date, \
        total_budget, record_status, created_at";

    fn from_row(row: NdisPlanRow) -> Result<Self, DatabaseError> {
        Ok(NdisPlan {
            id: NdisPlanId::new(row.id),
            client_id: ClientId::new(row.client_id),
            plan_number: row.plan_number,
            start_date: row.start_date,
            end_date: row.end_date,
            total_budget: row.total_budget,
            status: parse(Self::ENTITY, &row.record_status)?,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
pub struct NoticeRow {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub state: String,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    pub house_ids: Vec<i64>,
    pub created_by: Option<i64>,
    pub record_status: String,
    pub created_at: DateTime<Utc>,
}

impl Table for Notice {
    type Row = NoticeRow;
    const TABLE: &'static str = "notices";
    const COLUMNS: &'static str = "id, title, body, state, start_at, end_at, \
        ARRAY(SELECT notice_houses.house_id FROM notice_houses \
        WHERE notice_houses.notice_id = notices.id ORDER BY notice_houses.house_id) AS house_ids, \
        created_by, record_status, created_at";

    fn from_row(row: NoticeRow) -> Result<Self, DatabaseError> {
        Ok(Notice {
            id: NoticeId::new(row.id),
            title: row.title,
            body: row.body,
            state: parse(Self::ENTITY, &row.state)?,
            start_at: row.start_at,
            end_at: row.end_at,
            house_ids: row.house_ids.into_iter().map(HouseId::new).collect(),
            created_by: row.created_by.map(UserId::new),
            status: parse(Self::ENTITY, &row.record_status)?,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
pub struct MealRecordRow {
    pub id: i64,
    pub client_id: i64,
    pub meal_type: String,
    pub meal_date: NaiveDate,
    pub details: Option<String>,
    pub recorded_by: Option<i64>,
    pub record_status: String,
    pub created_at: DateTime<Utc>,
}

impl Table for MealRecord {
    type Row = MealRecordRow;
    const TABLE: &'static str = "meal_records";
    const COLUMNS: &'static str = "id, client_id, meal_type, meal_date, details, recorded_by, \
        record_status, created_at";

    fn from_row(row: MealRecordRow) -> Result<Self, DatabaseError> {
        Ok(MealRecord {
            id: MealRecordId::new(row.id),
            client_id: ClientId::new(row.client_id),
            meal_type: parse(Self::ENTITY, &row.meal_type)?,
            meal_date: row.meal_date,
            details: row.details,
            recorded_by: row.recorded_by.map(UserId::new),
            status: parse(Self::ENTITY, &row.record_status)?,
            created_at: row.created_at,
        })
    }
}
