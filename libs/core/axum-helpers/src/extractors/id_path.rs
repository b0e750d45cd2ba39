//! Numeric id path parameter.

use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

/// Extracts a single `i64` path segment such as `/library/user/{id}`.
///
/// ```ignore
/// async fn delete_user(IdPath(id): IdPath) -> StatusCode { .. }
/// ```
pub struct IdPath(pub i64);

impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::InvalidId(e.body_text()))?;

        raw.parse::<i64>()
            .map(IdPath)
            .map_err(|_| AppError::InvalidId(format!("Invalid id: {raw}")))
    }
}
