use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UserError {
    #[error("Email address already taken!")]
    EmailAlreadyTaken,

    #[error("Email is invalid!")]
    InvalidEmail,

    #[error("User with id {0} does not exists!")]
    UserNotFound(i64),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type UserResult<T> = Result<T, UserError>;

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::EmailAlreadyTaken => AppError::Conflict(err.to_string()),
            UserError::InvalidEmail => AppError::BadRequest(err.to_string()),
            UserError::UserNotFound(_) => AppError::NotFound(err.to_string()),
            UserError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}
