use core_config::{AppInfo, ConfigError, FromEnv, app_info, env_or_default, server::ServerConfig};
use database::postgres::PostgresConfig;

pub use core_config::Environment;

/// Where users are kept, chosen with `STORAGE`.
#[derive(Clone, Debug)]
pub enum StorageBackend {
    Postgres(PostgresConfig),
    /// Process-local store; nothing survives a restart
    Memory,
}

impl FromEnv for StorageBackend {
    fn from_env() -> Result<Self, ConfigError> {
        let storage = env_or_default("STORAGE", "postgres");

        match storage.trim().to_lowercase().as_str() {
            "postgres" => Ok(Self::Postgres(PostgresConfig::from_env()?)),
            "memory" => Ok(Self::Memory),
            other => Err(ConfigError::ParseError {
                key: "STORAGE".to_string(),
                details: format!("expected 'postgres' or 'memory', got '{other}'"),
            }),
        }
    }
}

/// Application configuration composed from the shared config components.
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub environment: Environment,
    pub server: ServerConfig,
    pub storage: StorageBackend,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?; // HOST=0.0.0.0, PORT=8080 by default
        let storage = StorageBackend::from_env()?; // DATABASE_URL required unless STORAGE=memory

        Ok(Self {
            app: app_info!(),
            environment,
            server,
            storage,
        })
    }
}
