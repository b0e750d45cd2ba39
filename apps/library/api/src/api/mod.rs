use axum::Router;

use crate::state::AppState;

pub mod health;
pub mod users;

/// Domain routes, each nested under its own prefix.
///
/// The returned router is stateless; `create_router` wraps it with docs and middleware.
pub fn routes(state: &AppState) -> Router {
    Router::new().nest(domain_users::handlers::BASE_PATH, users::router(state))
}

/// `/ready` with a real database check.
///
/// Has its state applied so it can be merged with the stateless app router.
pub fn ready_router(state: AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Environment, StorageBackend};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use core_config::{app_info, server::ServerConfig};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn memory_state() -> AppState {
        AppState {
            config: Config {
                app: app_info!(),
                environment: Environment::Development,
                server: ServerConfig::default(),
                storage: StorageBackend::Memory,
            },
            db: None,
        }
    }

    #[tokio::test]
    async fn test_user_routes_are_nested() {
        let app = routes(&memory_state());

        let response = app
            .oneshot(Request::get("/library/user").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"[]");
    }

    #[tokio::test]
    async fn test_ready_without_database() {
        let app = ready_router(memory_state());

        let response = app
            .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["status"], "ready");
    }
}
