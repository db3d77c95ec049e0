use super::common::{
    created_response, no_content_response, paginated_response, success_response,
    validate_input, DataResponse, PaginatedResponse, PaginationParams,
};
use crate::{
    entities::category, errors::ServiceError, services::categories::CategoryInput, AppState,
};
use axum::{
    extract::{Path, Query, State},
    response::Response,
    Json,
};

#[utoipa::path(
    get,
    path = "/api/v1/categories",
    params(PaginationParams),
    responses(
        (status = 200, description = "Categories listed", body = PaginatedResponse<category::Model>)
    ),
    tag = "categories"
)]
pub async fn list_categories(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<Response, ServiceError> {
    let (page, per_page) = params.resolve(&state.config);
    let (categories, total) = state.services.categories.list(page, per_page).await?;
    Ok(paginated_response(categories, page, per_page, total))
}

#[utoipa::path(
    get,
    path = "/api/v1/categories/:id",
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category fetched", body = DataResponse<category::Model>),
        (status = 404, description = "Category not found", body = crate::errors::ErrorResponse)
    ),
    tag = "categories"
)]
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, ServiceError> {
    let category = state.services.categories.get(id).await?;
    Ok(success_response(category))
}

#[utoipa::path(
    post,
    path = "/api/v1/categories",
    request_body = CategoryInput,
    responses(
        (status = 201, description = "Category created", body = DataResponse<category::Model>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "categories"
)]
pub async fn create_category(
    State(state): State<AppState>,
    Json(payload): Json<CategoryInput>,
) -> Result<Response, ServiceError> {
    validate_input(&payload)?;
    let category = state.services.categories.create(payload).await?;
    Ok(created_response(category))
}

#[utoipa::path(
    put,
    path = "/api/v1/categories/:id",
    params(("id" = i32, Path, description = "Category ID")),
    request_body = CategoryInput,
    responses(
        (status = 200, description = "Category updated", body = DataResponse<category::Model>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Category not found", body = crate::errors::ErrorResponse)
    ),
    tag = "categories"
)]
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<CategoryInput>,
) -> Result<Response, ServiceError> {
    validate_input(&payload)?;
    let category = state.services.categories.update(id, payload).await?;
    Ok(success_response(category))
}

#[utoipa::path(
    delete,
    path = "/api/v1/categories/:id",
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 404, description = "Category not found", body = crate::errors::ErrorResponse)
    ),
    tag = "categories"
)]
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, ServiceError> {
    state.services.categories.delete(id).await?;
    Ok(no_content_response())
}
