//! Database Test Utilities
//!
//! Starts PostgreSQL in a test container, loads the care schema and seeds
//! records built with [`crate::builders`]. Integration tests that use it are
//! marked `#[ignore]` because they need a running Docker daemon.

use sqlx::PgPool;
use testcontainers::{
    core::{IntoContainerPort, WaitFor},
    runners::AsyncRunner,
    ContainerAsync, GenericImage, ImageExt,
};

use domain_care::{
    Client, Contact, Document, House, Incident, MealRecord, NdisPlan, Note, Notice, User,
};
use infra_db::{create_pool, DatabaseConfig};

pub type TestResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

const POSTGRES_IMAGE: &str = "postgres";
const POSTGRES_TAG: &str = "16-alpine";
const POSTGRES_USER: &str = "test_user";
const POSTGRES_PASSWORD: &str = "test_password";
const POSTGRES_DB: &str = "care_test";

/// The schema the query layer reads
pub const CARE_SCHEMA: &str = include_str!("../../../schema/care.sql");

/// Tables the schema creates
pub const CARE_TABLES: &[&str] = &[
    "notice_houses",
    "notices",
    "meal_records",
    "ndis_plans",
    "contacts",
    "documents",
    "notes",
    "incidents",
    "users",
    "clients",
    "houses",
];

/// Connection details of a test database
#[derive(Debug, Clone)]
pub struct TestDatabaseConfig {
    pub user: String,
    pub password: String,
    pub database: String,
    pub host: String,
    pub port: u16,
}

impl Default for TestDatabaseConfig {
    fn default() -> Self {
        Self {
            user: POSTGRES_USER.to_string(),
            password: POSTGRES_PASSWORD.to_string(),
            database: POSTGRES_DB.to_string(),
            host: "localhost".to_string(),
            port: 5432,
        }
    }
}

impl TestDatabaseConfig {
    pub fn connection_url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.user, self.password, self.host, self.port, self.database
        )
    }
}

/// A PostgreSQL test container with the care schema loaded
pub struct TestDatabase {
    _container: ContainerAsync<GenericImage>,
    pub config: TestDatabaseConfig,
    pub pool: PgPool,
}

impl TestDatabase {
    /// Starts a new container and loads the schema
    pub async fn new() -> TestResult<Self> {
        let container = GenericImage::new(POSTGRES_IMAGE, POSTGRES_TAG)
            .with_exposed_port(5432.tcp())
            .with_wait_for(WaitFor::message_on_stderr(
                "database system is ready to accept connections",
            ))
            .with_env_var("POSTGRES_USER", POSTGRES_USER)
            .with_env_var("POSTGRES_PASSWORD", POSTGRES_PASSWORD)
            .with_env_var("POSTGRES_DB", POSTGRES_DB)
            .start()
            .await?;

        let port = container.get_host_port_ipv4(5432.tcp()).await?;
        let host = container.get_host().await?.to_string();

        let config = TestDatabaseConfig {
            host,
            port,
            ..TestDatabaseConfig::default()
        };

        let pool = create_pool(
            DatabaseConfig::new(config.connection_url())
                .max_connections(5)
                .min_connections(1),
        )
        .await?;

        let test_db = Self {
            _container: container,
            config,
            pool,
        };
        test_db.init_schema().await?;
        Ok(test_db)
    }

    async fn init_schema(&self) -> TestResult<()> {
        sqlx::raw_sql(CARE_SCHEMA).execute(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Creates a database owned by a single test
pub async fn create_isolated_test_database() -> TestResult<TestDatabase> {
    TestDatabase::new().await
}

pub async fn insert_house(pool: &PgPool, house: &House) -> TestResult<()> {
    sqlx::query(
        "INSERT INTO houses (id, house_code, name, address, phone, record_status, created_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(house.id.value())
    .bind(&house.house_code)
    .bind(&house.name)
    .bind(&house.address)
    .bind(&house.phone)
    .bind(house.status.as_str())
    .bind(house.created_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn insert_client(pool: &PgPool, client: &Client) -> TestResult<()> {
    sqlx::query(
        "INSERT INTO clients (id, name, house_id, house_code, date_of_birth, ndis_number, \
         record_status, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
    )
    .bind(client.id.value())
    .bind(&client.name)
    .bind(client.house_id.value())
    .bind(&client.house_code)
    .bind(client.date_of_birth)
    .bind(&client.ndis_number)
    .bind(client.status.as_str())
    .bind(client.created_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn insert_user(pool: &PgPool, user: &User) -> TestResult<()> {
    sqlx::query(
        "INSERT INTO users (id, first_name, last_name, email, role, house_id, house_code, \
         record_status, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
    )
    .bind(user.id.value())
    .bind(&user.first_name)
    .bind(&user.last_name)
    .bind(&user.email)
    .bind(user.role.as_str())
    .bind(user.house_id.map(|id| id.value()))
    .bind(&user.house_code)
    .bind(user.status.as_str())
    .bind(user.created_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn insert_incident(pool: &PgPool, incident: &Incident) -> TestResult<()> {
    sqlx::query(
        "INSERT INTO incidents (id, client_id, house_code, category, severity, state, \
         occurred_at, description, reported_by, record_status, created_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
    )
    .bind(incident.id.value())
    .bind(incident.client_id.value())
    .bind(&incident.house_code)
    .bind(incident.category.as_str())
    .bind(incident.severity.as_str())
    .bind(incident.state.as_str())
    .bind(incident.occurred_at)
    .bind(&incident.description)
    .bind(incident.reported_by.map(|id| id.value()))
    .bind(incident.status.as_str())
    .bind(incident.created_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn insert_note(pool: &PgPool, note: &Note) -> TestResult<()> {
    sqlx::query(
        "INSERT INTO notes (id, client_id, author_id, note_date, category, content, \
         record_status, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
    )
    .bind(note.id.value())
    .bind(note.client_id.value())
    .bind(note.author_id.map(|id| id.value()))
    .bind(note.note_date)
    .bind(note.category.as_str())
    .bind(&note.content)
    .bind(note.status.as_str())
    .bind(note.created_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn insert_document(pool: &PgPool, document: &Document) -> TestResult<()> {
    sqlx::query(
        "INSERT INTO documents (id, client_id, category, title, file_name, expiry_date, \
         uploaded_by, record_status, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
    )
    .bind(document.id.value())
    .bind(document.client_id.value())
    .bind(document.category.as_str())
    .bind(&document.title)
    .bind(&document.file_name)
    .bind(document.expiry_date)
    .bind(document.uploaded_by.map(|id| id.value()))
    .bind(document.status.as_str())
    .bind(document.created_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn insert_contact(pool: &PgPool, contact: &Contact) -> TestResult<()> {
    sqlx::query(
        "INSERT INTO contacts (id, client_id, name, relationship, phone, email, emergency, \
         record_status) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
    )
    .bind(contact.id.value())
    .bind(contact.client_id.value())
    .bind(&contact.name)
    .bind(&contact.relationship)
    .bind(&contact.phone)
    .bind(&contact.email)
    .bind(contact.emergency)
    .bind(contact.status.as_str())
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn insert_ndis_plan(pool: &PgPool, plan: &NdisPlan) -> TestResult<()> {
    sqlx::query(
        "INSERT INTO ndis_plans (id, client_id, plan_number, start_date, end_date, \
         total_budget, record_status, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
    )
    .bind(plan.id.value())
    .bind(plan.client_id.value())
    .bind(&plan.plan_number)
    .bind(plan.start_date)
    .bind(plan.end_date)
    .bind(plan.total_budget)
    .bind(plan.status.as_str())
    .bind(plan.created_at)
    .execute(pool)
    .await?;
    Ok(())
}

/// Inserts the notice and its house links
pub async fn insert_notice(pool: &PgPool, notice: &Notice) -> TestResult<()> {
    sqlx::query(
        "INSERT INTO notices (id, title, body, state, start_at, end_at, created_by, \
         record_status, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
    )
    .bind(notice.id.value())
    .bind(&notice.title)
    .bind(&notice.body)
    .bind(notice.state.as_str())
    .bind(notice.start_at)
    .bind(notice.end_at)
    .bind(notice.created_by.map(|id| id.value()))
    .bind(notice.status.as_str())
    .bind(notice.created_at)
    .execute(pool)
    .await?;

    for house_id in &notice.house_ids {
        sqlx::query("INSERT INTO notice_houses (notice_id, house_id) VALUES ($1, $2)")
            .bind(notice.id.value())
            .bind(house_id.value())
            .execute(pool)
            .await?;
    }
    Ok(())
}

pub async fn insert_meal_record(pool: &PgPool, meal: &MealRecord) -> TestResult<()> {
    sqlx::query(
        "INSERT INTO meal_records (id, client_id, meal_type, meal_date, details, recorded_by, \
         record_status, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
    )
    .bind(meal.id.value())
    .bind(meal.client_id.value())
    .bind(meal.meal_type.as_str())
    .bind(meal.meal_date)
    .bind(&meal.details)
    .bind(meal.recorded_by.map(|id| id.value()))
    .bind(meal.status.as_str())
    .bind(meal.created_at)
    .execute(pool)
    .await?;
    Ok(())
}
