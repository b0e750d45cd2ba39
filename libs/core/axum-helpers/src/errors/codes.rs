//! Error codes carried by every [`ErrorResponse`](super::ErrorResponse).
//!
//! Each code has a string form for clients, an integer for logs and a default
//! message.
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! let code = ErrorCode::Conflict;
//! assert_eq!(code.as_str(), "CONFLICT");
//! assert_eq!(code.code(), 1008);
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Request body failed field validation
    ValidationError,
    /// Path id is not a valid integer
    InvalidId,
    /// Request body is not the expected JSON
    JsonExtraction,
    /// Query string could not be decoded
    InvalidQuery,
    NotFound,
    InternalError,
    /// Request rejected by a business rule
    BadRequest,
    Conflict,
    ServiceUnavailable,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::InvalidId => "INVALID_ID",
            Self::JsonExtraction => "JSON_EXTRACTION",
            Self::InvalidQuery => "INVALID_QUERY",
            Self::NotFound => "NOT_FOUND",
            Self::InternalError => "INTERNAL_ERROR",
            Self::BadRequest => "BAD_REQUEST",
            Self::Conflict => "CONFLICT",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
        }
    }

    /// Integer code for structured logs.
    ///
    /// Client errors live in 1000-1999.
    pub fn code(&self) -> i32 {
        match self {
            Self::ValidationError => 1001,
            Self::InvalidId => 1002,
            Self::JsonExtraction => 1003,
            Self::NotFound => 1004,
            Self::InternalError => 1005,
            Self::BadRequest => 1006,
            Self::Conflict => 1008,
            Self::InvalidQuery => 1010,
            Self::ServiceUnavailable => 1011,
        }
    }

    pub fn default_message(&self) -> &'static str {
        match self {
            Self::ValidationError => "Request validation failed",
            Self::InvalidId => "Invalid id format",
            Self::JsonExtraction => "Failed to parse request body",
            Self::InvalidQuery => "Invalid query parameters",
            Self::NotFound => "Resource not found",
            Self::InternalError => "An internal server error occurred",
            Self::BadRequest => "Bad request",
            Self::Conflict => "Resource already exists",
            Self::ServiceUnavailable => "Service is temporarily unavailable",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
