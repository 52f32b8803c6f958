//! Database settings
//!
//! Read from `CARE_DB_*` environment variables, with a `.env` file picked up
//! by the binary before loading.

use serde::Deserialize;
use std::time::Duration;

use crate::pool::{DatabaseConfig, DEFAULT_DATABASE_URL};

/// Environment variable prefix for every setting
pub const ENV_PREFIX: &str = "CARE_DB";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DatabaseSettings {
    /// `CARE_DB_URL`
    pub url: String,
    /// `CARE_DB_MAX_CONNECTIONS`
    pub max_connections: u32,
    /// `CARE_DB_MIN_CONNECTIONS`
    pub min_connections: u32,
    /// `CARE_DB_CONNECT_TIMEOUT_SECS`
    pub connect_timeout_secs: u64,
    /// `CARE_DB_LOG_LEVEL`: trace, debug, info, warn or error
    pub log_level: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout_secs: 30,
            log_level: "info".to_string(),
        }
    }
}

impl DatabaseSettings {
    /// Loads settings from the process environment
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::load(config::Environment::with_prefix(ENV_PREFIX))
    }

    /// Loads settings from an explicit variable map instead of the process
    /// environment
    pub fn from_vars(vars: config::Map<String, String>) -> Result<Self, config::ConfigError> {
        Self::load(config::Environment::with_prefix(ENV_PREFIX).source(Some(vars)))
    }

    fn load(environment: config::Environment) -> Result<Self, config::ConfigError> {
        let defaults = Self::default();
        config::Config::builder()
            .set_default("url", defaults.url)?
            .set_default("max_connections", i64::from(defaults.max_connections))?
            .set_default("min_connections", i64::from(defaults.min_connections))?
            .set_default("connect_timeout_secs", defaults.connect_timeout_secs as i64)?
            .set_default("log_level", defaults.log_level)?
            .add_source(environment.try_parsing(true))
            .build()?
            .try_deserialize()
    }

    pub fn pool_config(&self) -> DatabaseConfig {
        DatabaseConfig::new(self.url.clone())
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .connect_timeout(Duration::from_secs(self.connect_timeout_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> config::Map<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_apply_without_variables() {
        let settings = DatabaseSettings::from_vars(vars(&[])).unwrap();
        assert_eq!(settings, DatabaseSettings::default());
    }

    #[test]
    fn prefixed_variables_override_defaults() {
        let settings = DatabaseSettings::from_vars(vars(&[
            ("CARE_DB_URL", "postgres://db.internal/care"),
            ("CARE_DB_MAX_CONNECTIONS", "25"),
            ("CARE_DB_LOG_LEVEL", "debug"),
            ("DATABASE_URL", "postgres://ignored/other"),
        ]))
        .unwrap();

        assert_eq!(settings.url, "postgres://db.internal/care");
        assert_eq!(settings.max_connections, 25);
        assert_eq!(settings.min_connections, 1);
        assert_eq!(settings.log_level, "debug");

        let pool = settings.pool_config();
        assert_eq!(pool.max_connections, 25);
        assert_eq!(pool.connect_timeout, Duration::from_secs(30));
    }

    #[test]
    fn malformed_numbers_are_rejected() {
        let result = DatabaseSettings::from_vars(vars(&[("CARE_DB_MAX_CONNECTIONS", "lots")]));
        assert!(result.is_err());
    }
}
