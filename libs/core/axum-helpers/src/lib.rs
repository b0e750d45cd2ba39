//! # Axum Helpers
//!
//! Shared HTTP plumbing for the library registry services.
//!
//! - **[`server`]**: router assembly, health endpoints, graceful shutdown
//! - **[`http`]**: CORS and security-header middleware
//! - **[`errors`]**: [`AppError`] and the JSON [`ErrorResponse`] with error codes
//! - **[`extractors`]**: id path, validated JSON body and validated query string

pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_production_app, create_router,
    health_router, run_health_checks, shutdown_signal,
};

pub use http::{cors_layer, security_headers};

pub use errors::{AppError, ErrorCode, ErrorResponse};

pub use extractors::{IdPath, ValidatedJson, ValidatedQuery};
