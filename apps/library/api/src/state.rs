//! Shared application state handed to the routers.

use database::postgres::DatabaseConnection;

/// Cloned into each router; the connection is an `Arc`-backed pool.
#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    /// `None` when running with `STORAGE=memory`
    pub db: Option<DatabaseConnection>,
}
