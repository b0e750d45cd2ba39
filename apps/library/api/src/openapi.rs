use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    components(
        schemas(axum_helpers::ErrorResponse, axum_helpers::ErrorCode)
    ),
    info(
        title = "Library API",
        version = "0.1.0",
        description = "Registry of library users"
    ),
    nest(
        (path = domain_users::handlers::BASE_PATH, api = domain_users::handlers::ApiDoc)
    )
)]
pub struct ApiDoc;
