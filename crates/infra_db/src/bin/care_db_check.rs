//! Care DB Check - connectivity and schema smoke test
//!
//! Connects with the configured settings, runs `SELECT 1`, then counts the
//! active houses and clients through the same repositories the application
//! uses. A non-zero exit code means the database is unreachable or its
//! schema does not match.
//!
//! # Usage
//!
//! ```bash
//! CARE_DB_URL=postgres://localhost/care cargo run --bin care-db-check
//! ```
//!
//! # Environment Variables
//!
//! * `CARE_DB_URL` - PostgreSQL connection string
//! * `CARE_DB_MAX_CONNECTIONS` - Pool size (default: 10)
//! * `CARE_DB_LOG_LEVEL` - trace, debug, info, warn or error (default: info)

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use core_kernel::StatusFilter;
use domain_care::{ClientRepository, HouseRepository};
use infra_db::{create_pool, ping, DatabaseSettings, PgRecordStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = DatabaseSettings::from_env().context("invalid CARE_DB_* settings")?;
    init_tracing(&settings.log_level);

    let pool = create_pool(settings.pool_config())
        .await
        .context("could not create the connection pool")?;
    ping(&pool).await.context("database did not answer")?;

    let houses = HouseRepository::new(PgRecordStore::new(pool.clone()))
        .count(StatusFilter::Active)
        .await
        .context("counting houses")?;
    let clients = ClientRepository::new(PgRecordStore::new(pool.clone()))
        .count(StatusFilter::Active)
        .await
        .context("counting clients")?;

    tracing::info!(houses, clients, "Database ready");
    pool.close().await;
    Ok(())
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}
