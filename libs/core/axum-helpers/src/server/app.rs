use super::shutdown::ShutdownCoordinator;
use crate::errors::handlers::not_found;
use crate::http::{cors_layer, security_headers};
use axum::{Router, middleware};
use core_config::server::ServerConfig;
use std::future::Future;
use std::io;
use std::time::Duration;
use tower_http::compression::CompressionLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info, warn};
use utoipa::OpenApi;

/// Wraps the application routes with documentation UIs and shared middleware.
///
/// - Swagger UI at `/swagger-ui` (spec at `/api-docs/openapi.json`), ReDoc at
///   `/redoc`, RapiDoc at `/rapidoc`, Scalar at `/scalar`
/// - `apis` mounted at the root, so domain routers choose their own prefixes
/// - JSON 404 fallback, request tracing, security headers, CORS, compression
///
/// `CORS_ALLOWED_ORIGIN` must hold a comma-separated list of origins, e.g.
/// `http://localhost:3000,https://library.example.com`.
///
/// # Errors
/// Returns `InvalidInput` when `CORS_ALLOWED_ORIGIN` is unset, empty or malformed.
pub fn create_router<T>(apis: Router) -> io::Result<Router>
where
    T: OpenApi + 'static,
{
    use utoipa_rapidoc::RapiDoc;
    use utoipa_redoc::{Redoc, Servable as RedocServable};
    use utoipa_scalar::{Scalar, Servable as ScalarServable};
    use utoipa_swagger_ui::SwaggerUi;

    let origins = std::env::var("CORS_ALLOWED_ORIGIN").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "CORS_ALLOWED_ORIGIN environment variable is required. Example: CORS_ALLOWED_ORIGIN=http://localhost:3000",
        )
    })?;
    let cors = cors_layer(&origins)?;
    info!(origins = %origins, "CORS configured");

    let router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", T::openapi()))
        .merge(Redoc::with_url("/redoc", T::openapi()))
        .merge(RapiDoc::new("/api-docs/openapi.json").path("/rapidoc"))
        .merge(Scalar::with_url("/scalar", T::openapi()))
        .merge(apis)
        .fallback(not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(middleware::from_fn(security_headers))
        .layer(cors)
        .layer(CompressionLayer::new());

    Ok(router)
}

/// Serves `router` until SIGINT/SIGTERM, then runs `cleanup` bounded by `shutdown_timeout`.
///
/// In-flight requests are drained before the function returns.
pub async fn create_production_app<F>(
    router: Router,
    server_config: &ServerConfig,
    shutdown_timeout: Duration,
    cleanup: F,
) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let coordinator = ShutdownCoordinator::new();

    let listener = tokio::net::TcpListener::bind(server_config.address()).await?;
    info!("Server starting on {}", listener.local_addr()?);

    let cleanup_trigger = coordinator.clone();
    let cleanup_handle = tokio::spawn(async move {
        cleanup_trigger.wait().await;

        info!(timeout = ?shutdown_timeout, "Running cleanup");
        if tokio::time::timeout(shutdown_timeout, cleanup).await.is_err() {
            warn!(timeout = ?shutdown_timeout, "Cleanup timed out, forcing shutdown");
        }
    });

    let signal = coordinator.clone();
    let serve_result = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(async move { signal.wait_for_signal().await })
        .await
        .inspect_err(|e| tracing::error!("Server encountered an error: {:?}", e));

    // Make sure cleanup runs even if the server stopped on its own.
    coordinator.shutdown();
    cleanup_handle.await.ok();

    serve_result
}
