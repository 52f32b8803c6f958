//! Database error types
//!
//! Driver failures are classified once here, then folded into the
//! storage-agnostic [`RepositoryError`] that repository callers see.

use domain_care::RepositoryError;
use thiserror::Error;

/// Errors that can occur while talking to PostgreSQL
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Failed to establish a database connection
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Pool exhaustion - no connection became available in time
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// The statement referenced a table or column the schema lacks
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// A stored row could not be turned into a domain record
    #[error("Row mapping failed for {entity}: {message}")]
    Mapping {
        entity: &'static str,
        message: String,
    },

    /// Invalid settings supplied to the pool
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl DatabaseError {
    /// Creates a mapping error for a stored column value
    ///
    /// # Example
    ///
    /// ```rust
    /// use infra_db::DatabaseError;
    ///
    /// let error = DatabaseError::mapping("Incident", "unknown severity 'severe'");
    /// assert!(error.to_string().contains("Incident"));
    /// ```
    pub fn mapping(entity: &'static str, message: impl std::fmt::Display) -> Self {
        DatabaseError::Mapping {
            entity,
            message: message.to_string(),
        }
    }

    /// Checks if this error is a connection-related issue
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            DatabaseError::ConnectionFailed(_) | DatabaseError::PoolExhausted
        )
    }
}

/// Classifies SQLx errors by failure kind and PostgreSQL error code
///
/// See <https://www.postgresql.org/docs/current/errcodes-appendix.html>.
impl From<&sqlx::Error> for DatabaseError {
    fn from(error: &sqlx::Error) -> Self {
        match error {
            sqlx::Error::PoolTimedOut => DatabaseError::PoolExhausted,
            sqlx::Error::PoolClosed | sqlx::Error::Io(_) | sqlx::Error::Tls(_) => {
                DatabaseError::ConnectionFailed(error.to_string())
            }
            sqlx::Error::Configuration(e) => DatabaseError::Configuration(e.to_string()),
            sqlx::Error::ColumnNotFound(column) => {
                DatabaseError::SchemaMismatch(format!("column '{}' not in result", column))
            }
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => DatabaseError::Mapping {
                entity: "row",
                message: error.to_string(),
            },
            sqlx::Error::Database(db_err) => {
                let message = db_err.message().to_string();
                match db_err.code().as_deref() {
                    // connection_exception class, admin_shutdown, cannot_connect_now
                    Some(code) if code.starts_with("08") => {
                        DatabaseError::ConnectionFailed(message)
                    }
                    Some("57P01") | Some("57P03") => DatabaseError::ConnectionFailed(message),
                    Some("42P01") | Some("42703") => DatabaseError::SchemaMismatch(message),
                    _ => DatabaseError::QueryFailed(message),
                }
            }
            _ => DatabaseError::QueryFailed(error.to_string()),
        }
    }
}

impl From<sqlx::Error> for DatabaseError {
    fn from(error: sqlx::Error) -> Self {
        DatabaseError::from(&error)
    }
}

impl From<DatabaseError> for RepositoryError {
    fn from(error: DatabaseError) -> Self {
        match error {
            DatabaseError::ConnectionFailed(_) | DatabaseError::PoolExhausted => {
                RepositoryError::Unavailable(error.to_string())
            }
            DatabaseError::Mapping { .. } => RepositoryError::Mapping(error.to_string()),
            DatabaseError::SchemaMismatch(_)
            | DatabaseError::QueryFailed(_)
            | DatabaseError::Configuration(_) => RepositoryError::Query(error.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_failures_become_unavailable() {
        let error: RepositoryError = DatabaseError::from(sqlx::Error::PoolTimedOut).into();
        assert!(error.is_transient());

        let error: RepositoryError = DatabaseError::from(sqlx::Error::PoolClosed).into();
        assert!(matches!(error, RepositoryError::Unavailable(_)));
    }

    #[test]
    fn missing_column_is_a_query_error() {
        let error: RepositoryError =
            DatabaseError::from(sqlx::Error::ColumnNotFound("house_code".into())).into();
        assert!(matches!(error, RepositoryError::Query(ref m) if m.contains("house_code")));
        assert!(!error.is_transient());
    }

    #[test]
    fn mapping_errors_keep_the_entity() {
        let error: RepositoryError = DatabaseError::mapping("Notice", "bad state").into();
        match error {
            RepositoryError::Mapping(message) => {
                assert!(message.contains("Notice"));
                assert!(message.contains("bad state"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
