use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};
use axum_helpers::{
    IdPath, ValidatedJson, ValidatedQuery,
    errors::responses::{
        BadRequestResponse, ConflictResponse, InternalServerErrorResponse, NotFoundResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::{
    error::UserResult,
    models::{CreateUser, UpdateUser, UserResponse},
    repository::UserRepository,
    service::UserService,
};

/// Path the user routes are mounted under.
pub const BASE_PATH: &str = "/library/user";

/// OpenAPI documentation for the library user API.
///
/// Paths are relative to [`BASE_PATH`], like the routes of [`router`].
#[derive(OpenApi)]
#[openapi(
    paths(list_users, add_user, update_user, delete_user),
    components(
        schemas(UserResponse, CreateUser),
        responses(
            BadRequestResponse,
            NotFoundResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "users", description = "Library patron registry")
    )
)]
pub struct ApiDoc;

/// Routes relative to [`BASE_PATH`]; nest the result there.
pub fn router<R>(service: UserService<R>) -> Router
where
    R: UserRepository + 'static,
{
    let service = Arc::new(service);

    Router::new()
        .route("/", get(list_users).post(add_user))
        .route("/{id}", put(update_user).delete(delete_user))
        .with_state(service)
}

/// List all users
#[utoipa::path(
    get,
    path = "",
    tag = "users",
    responses(
        (status = 200, description = "All registered users", body = [UserResponse]),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_users<R>(
    State(service): State<Arc<UserService<R>>>,
) -> UserResult<impl IntoResponse>
where
    R: UserRepository,
{
    let users = service.list_users().await?;
    let body: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    Ok(Json(body))
}

/// Register a new user
#[utoipa::path(
    post,
    path = "",
    tag = "users",
    request_body = CreateUser,
    responses(
        (status = 201, description = "User registered", body = UserResponse),
        (status = 400, response = BadRequestResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn add_user<R>(
    State(service): State<Arc<UserService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateUser>,
) -> UserResult<impl IntoResponse>
where
    R: UserRepository,
{
    let user = service.add_user(input).await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Update a user's names and/or email
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "users",
    params(
        ("id" = i64, Path, description = "User id"),
        UpdateUser
    ),
    responses(
        (status = 200, description = "User after the update", body = UserResponse),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_user<R>(
    State(service): State<Arc<UserService<R>>>,
    IdPath(id): IdPath,
    ValidatedQuery(changes): ValidatedQuery<UpdateUser>,
) -> UserResult<impl IntoResponse>
where
    R: UserRepository,
{
    let user = service.update_user(id, changes).await?;
    Ok(Json(UserResponse::from(user)))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "users",
    params(
        ("id" = i64, Path, description = "User id")
    ),
    responses(
        (status = 204, description = "User deleted"),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_user<R>(
    State(service): State<Arc<UserService<R>>>,
    IdPath(id): IdPath,
) -> UserResult<impl IntoResponse>
where
    R: UserRepository,
{
    service.delete_user(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
