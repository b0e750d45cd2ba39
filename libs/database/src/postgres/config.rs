use sea_orm::ConnectOptions;
use std::time::Duration;

#[cfg(feature = "config")]
use core_config::{ConfigError, FromEnv, env_parse_or, env_required};

/// Pool settings for the PostgreSQL connection.
///
/// With the `config` feature it loads from the environment:
///
/// | Variable | Default |
/// |---|---|
/// | `DATABASE_URL` | required |
/// | `DB_MAX_CONNECTIONS` | 20 |
/// | `DB_MIN_CONNECTIONS` | 2 |
/// | `DB_CONNECT_TIMEOUT_SECS` | 8 |
/// | `DB_ACQUIRE_TIMEOUT_SECS` | 8 |
/// | `DB_IDLE_TIMEOUT_SECS` | 300 |
/// | `DB_MAX_LIFETIME_SECS` | 1800 |
/// | `DB_SQLX_LOGGING` | false |
#[derive(Clone, Debug)]
pub struct PostgresConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
    /// Log every statement through sqlx
    pub sqlx_logging: bool,
}

impl PostgresConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_pool_size(mut self, max_connections: u32, min_connections: u32) -> Self {
        self.max_connections = max_connections;
        self.min_connections = min_connections;
        self
    }

    pub fn into_connect_options(self) -> ConnectOptions {
        let mut opt = ConnectOptions::new(self.url);
        opt.max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .connect_timeout(self.connect_timeout)
            .acquire_timeout(self.acquire_timeout)
            .idle_timeout(self.idle_timeout)
            .max_lifetime(self.max_lifetime)
            .sqlx_logging(self.sqlx_logging);
        opt
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: 20,
            min_connections: 2,
            connect_timeout: Duration::from_secs(8),
            acquire_timeout: Duration::from_secs(8),
            idle_timeout: Duration::from_secs(300),
            max_lifetime: Duration::from_secs(1800),
            sqlx_logging: false,
        }
    }
}

#[cfg(feature = "config")]
impl FromEnv for PostgresConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let secs = |key: &str, default: Duration| {
            env_parse_or(key, default.as_secs()).map(Duration::from_secs)
        };

        Ok(Self {
            url: env_required("DATABASE_URL")?,
            max_connections: env_parse_or("DB_MAX_CONNECTIONS", defaults.max_connections)?,
            min_connections: env_parse_or("DB_MIN_CONNECTIONS", defaults.min_connections)?,
            connect_timeout: secs("DB_CONNECT_TIMEOUT_SECS", defaults.connect_timeout)?,
            acquire_timeout: secs("DB_ACQUIRE_TIMEOUT_SECS", defaults.acquire_timeout)?,
            idle_timeout: secs("DB_IDLE_TIMEOUT_SECS", defaults.idle_timeout)?,
            max_lifetime: secs("DB_MAX_LIFETIME_SECS", defaults.max_lifetime)?,
            sqlx_logging: env_parse_or("DB_SQLX_LOGGING", defaults.sqlx_logging)?,
        })
    }
}
