use super::common::{
    created_response, no_content_response, paginated_response, success_response,
    validate_input, DataResponse, PaginatedResponse, PaginationParams,
};
use crate::{entities::user, errors::ServiceError, services::users::CreateUserInput, AppState};
use axum::{
    extract::{Path, Query, State},
    response::Response,
    Json,
};

#[utoipa::path(
    get,
    path = "/api/v1/users",
    params(PaginationParams),
    responses(
        (status = 200, description = "Users listed", body = PaginatedResponse<user::Model>)
    ),
    tag = "users"
)]
pub async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<Response, ServiceError> {
    let (page, per_page) = params.resolve(&state.config);
    let (users, total) = state.services.users.list(page, per_page).await?;
    Ok(paginated_response(users, page, per_page, total))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/:id",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User fetched", body = DataResponse<user::Model>),
        (status = 404, description = "User not found", body = crate::errors::ErrorResponse)
    ),
    tag = "users"
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, ServiceError> {
    Ok(success_response(state.services.users.get(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = CreateUserInput,
    responses(
        (status = 201, description = "User created", body = DataResponse<user::Model>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Location not found", body = crate::errors::ErrorResponse)
    ),
    tag = "users"
)]
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserInput>,
) -> Result<Response, ServiceError> {
    validate_input(&payload)?;
    let user = state.services.users.create(payload).await?;
    Ok(created_response(user))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/:id",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "User not found", body = crate::errors::ErrorResponse)
    ),
    tag = "users"
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, ServiceError> {
    state.services.users.delete(id).await?;
    Ok(no_content_response())
}
