use axum_helpers::server::{create_production_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use database::postgres::{close, connect_from_config_with_retry, run_migrations};
use migration::Migrator;
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::{Config, StorageBackend};
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Before any fallible operation, so startup errors are reported in color
    install_color_eyre();

    let config = Config::from_env()?;

    init_tracing(&config.environment);

    let db = match &config.storage {
        StorageBackend::Postgres(pg) => {
            let db = connect_from_config_with_retry(pg.clone(), None)
                .await
                .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))?;

            run_migrations::<Migrator>(&db, config.app.name)
                .await
                .map_err(|e| eyre::eyre!("Migrations failed: {}", e))?;

            Some(db)
        }
        StorageBackend::Memory => None,
    };

    let state = AppState { config, db };

    let api_routes = api::routes(&state);
    let router = create_router::<openapi::ApiDoc>(api_routes)?;

    // /health: liveness with app name/version
    // /ready: readiness with the database check
    let app = router
        .merge(health_router(state.config.app))
        .merge(api::ready_router(state.clone()));

    info!(
        app = state.config.app.name,
        version = state.config.app.version,
        "Starting library API"
    );

    let server = state.config.server.clone();

    // State moves into the cleanup future
    create_production_app(app, &server, Duration::from_secs(30), async move {
        if let Some(db) = state.db {
            info!("Shutting down: closing database connections");
            close(db).await;
        }
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Library API shutdown complete");
    Ok(())
}
