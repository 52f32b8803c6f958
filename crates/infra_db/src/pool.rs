//! Database connection pool management

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{debug, info};

use crate::error::DatabaseError;

/// Type alias for the PostgreSQL connection pool
pub type DatabasePool = PgPool;

/// Local development database used when nothing else is configured
pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost/care";

/// Configuration options for the database connection pool
///
/// # Example
///
/// ```rust
/// use infra_db::DatabaseConfig;
/// use std::time::Duration;
///
/// let config = DatabaseConfig::new("postgres://localhost/care")
///     .max_connections(20)
///     .min_connections(5)
///     .connect_timeout(Duration::from_secs(10));
/// assert_eq!(config.max_connections, 20);
/// ```
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection string
    pub url: String,
    /// Upper bound on open connections
    pub max_connections: u32,
    /// Connections kept open while idle
    pub min_connections: u32,
    /// How long a caller waits for a pooled connection
    pub connect_timeout: Duration,
    /// Age after which a connection is recycled
    pub max_lifetime: Duration,
    /// Inactivity after which a connection above the minimum is closed
    pub idle_timeout: Duration,
}

impl DatabaseConfig {
    /// Creates a configuration for the given connection URL
    ///
    /// # Arguments
    ///
    /// * `url` - PostgreSQL connection string (e.g., "postgres://care:secret@db/care")
    ///
    /// # Returns
    ///
    /// A `DatabaseConfig` with a 1..=10 connection pool, a 30s acquire
    /// timeout, 30 min lifetime and 10 min idle timeout
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            max_lifetime: Duration::from_secs(30 * 60),
            idle_timeout: Duration::from_secs(10 * 60),
        }
    }

    /// Sets the maximum number of pooled connections
    ///
    /// # Arguments
    ///
    /// * `max` - Maximum connection count (default: 10)
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the number of connections kept open
    ///
    /// # Arguments
    ///
    /// * `min` - Minimum connection count (default: 1)
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Sets how long to wait for a connection from the pool
    ///
    /// # Arguments
    ///
    /// * `timeout` - Acquire timeout (default: 30s)
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the maximum lifetime of a connection
    ///
    /// # Arguments
    ///
    /// * `lifetime` - Age at which a connection is replaced (default: 30 min)
    pub fn max_lifetime(mut self, lifetime: Duration) -> Self {
        self.max_lifetime = lifetime;
        self
    }

    /// Sets the idle timeout before closing a connection
    ///
    /// # Arguments
    ///
    /// * `timeout` - Inactivity before closing (default: 10 min)
    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    /// Rejects settings the pool would misbehave with
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Configuration` for an empty URL, a zero-sized
    /// pool or a minimum above the maximum.
    pub fn validate(&self) -> Result<(), DatabaseError> {
        if self.url.trim().is_empty() {
            return Err(DatabaseError::Configuration("database url is empty".into()));
        }
        if self.max_connections == 0 {
            return Err(DatabaseError::Configuration(
                "max_connections must be at least 1".into(),
            ));
        }
        if self.min_connections > self.max_connections {
            return Err(DatabaseError::Configuration(format!(
                "min_connections {} exceeds max_connections {}",
                self.min_connections, self.max_connections
            )));
        }
        Ok(())
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DATABASE_URL)
    }
}

/// Creates a database connection pool with the given configuration
///
/// The settings are validated first, then the pool opens its minimum
/// connections so a bad URL or unreachable server fails here rather than on
/// the first query.
///
/// # Arguments
///
/// * `config` - Pool configuration, usually from `DatabaseSettings`
///
/// # Returns
///
/// A `Result` containing the connection pool or a database error
///
/// # Errors
///
/// Returns `DatabaseError::Configuration` for invalid settings and
/// `DatabaseError::ConnectionFailed` if the first connection cannot be made.
///
/// # Example
///
/// ```rust,ignore
/// use infra_db::{DatabaseConfig, create_pool};
///
/// let pool = create_pool(DatabaseConfig::new("postgres://localhost/care")).await?;
/// ```
pub async fn create_pool(config: DatabaseConfig) -> Result<DatabasePool, DatabaseError> {
    config.validate()?;
    info!(
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        "Creating database pool"
    );

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.connect_timeout)
        .max_lifetime(config.max_lifetime)
        .idle_timeout(config.idle_timeout)
        .connect(&config.url)
        .await
        .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

    info!("Database pool created successfully");
    Ok(pool)
}

/// Round-trips a trivial statement to prove the pool can reach the server
///
/// # Errors
///
/// Returns the mapped `DatabaseError` when the statement cannot run, e.g.
/// `PoolExhausted` when no connection frees up within the acquire timeout.
pub async fn ping(pool: &DatabasePool) -> Result<(), DatabaseError> {
    let one: i32 = sqlx::query_scalar("SELECT 1").fetch_one(pool).await?;
    debug!(result = one, "Database ping");
    Ok(())
}
