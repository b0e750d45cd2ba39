use axum::Router;
use domain_users::{InMemoryUserRepository, PgUserRepository, UserService, handlers};

use crate::state::AppState;

/// User routes backed by PostgreSQL, or by the in-memory store when no database is configured.
pub fn router(state: &AppState) -> Router {
    match &state.db {
        Some(db) => handlers::router(UserService::new(PgUserRepository::new(db.clone()))),
        None => {
            tracing::warn!("Using the in-memory user store; data is lost on restart");
            handlers::router(UserService::new(InMemoryUserRepository::new()))
        }
    }
}
