use super::common::{
    created_response, no_content_response, paginated_response, success_response,
    validate_input, DataResponse, PaginatedResponse, PaginationParams,
};
use crate::{
    entities::condition, errors::ServiceError, services::conditions::ConditionInput, AppState,
};
use axum::{
    extract::{Path, Query, State},
    response::Response,
    Json,
};

#[utoipa::path(
    get,
    path = "/api/v1/conditions",
    params(PaginationParams),
    responses(
        (status = 200, description = "Conditions listed", body = PaginatedResponse<condition::Model>)
    ),
    tag = "conditions"
)]
pub async fn list_conditions(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<Response, ServiceError> {
    let (page, per_page) = params.resolve(&state.config);
    let (conditions, total) = state.services.conditions.list(page, per_page).await?;
    Ok(paginated_response(conditions, page, per_page, total))
}

#[utoipa::path(
    post,
    path = "/api/v1/conditions",
    request_body = ConditionInput,
    responses(
        (status = 201, description = "Condition created", body = DataResponse<condition::Model>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "conditions"
)]
pub async fn create_condition(
    State(state): State<AppState>,
    Json(payload): Json<ConditionInput>,
) -> Result<Response, ServiceError> {
    validate_input(&payload)?;
    let condition = state.services.conditions.create(payload).await?;
    Ok(created_response(condition))
}

#[utoipa::path(
    put,
    path = "/api/v1/conditions/:id",
    params(("id" = i32, Path, description = "Condition ID")),
    request_body = ConditionInput,
    responses(
        (status = 200, description = "Condition updated", body = DataResponse<condition::Model>),
        (status = 404, description = "Condition not found", body = crate::errors::ErrorResponse)
    ),
    tag = "conditions"
)]
pub async fn update_condition(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<ConditionInput>,
) -> Result<Response, ServiceError> {
    validate_input(&payload)?;
    let condition = state.services.conditions.update(id, payload).await?;
    Ok(success_response(condition))
}

#[utoipa::path(
    delete,
    path = "/api/v1/conditions/:id",
    params(("id" = i32, Path, description = "Condition ID")),
    responses(
        (status = 204, description = "Condition deleted"),
        (status = 404, description = "Condition not found", body = crate::errors::ErrorResponse)
    ),
    tag = "conditions"
)]
pub async fn delete_condition(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, ServiceError> {
    state.services.conditions.delete(id).await?;
    Ok(no_content_response())
}
