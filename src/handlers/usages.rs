use super::common::{created_response, success_response, validate_input, DataResponse};
use crate::{
    errors::ServiceError,
    services::usage::{RecordUsageInput, UsageResource},
    AppState,
};
use axum::{
    extract::{Path, State},
    response::Response,
    Json,
};
use chrono::Utc;

#[utoipa::path(
    get,
    path = "/api/v1/items/:id/usages",
    params(("id" = i32, Path, description = "Item ID")),
    responses(
        (status = 200, description = "Usage history in period order", body = DataResponse<Vec<UsageResource>>),
        (status = 404, description = "Item not found", body = crate::errors::ErrorResponse)
    ),
    tag = "usages"
)]
pub async fn usage_history(
    State(state): State<AppState>,
    Path(item_id): Path<i32>,
) -> Result<Response, ServiceError> {
    let history = state.services.usage.history(item_id).await?;
    Ok(success_response(history))
}

/// Records usage; a missing or blank period becomes the current quarter
#[utoipa::path(
    post,
    path = "/api/v1/usages",
    request_body = RecordUsageInput,
    responses(
        (status = 201, description = "Usage recorded", body = DataResponse<UsageResource>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Item not found", body = crate::errors::ErrorResponse)
    ),
    tag = "usages"
)]
pub async fn record_usage(
    State(state): State<AppState>,
    Json(payload): Json<RecordUsageInput>,
) -> Result<Response, ServiceError> {
    validate_input(&payload)?;
    let today = Utc::now().date_naive();
    let usage = state.services.usage.record(payload, today).await?;
    Ok(created_response(usage))
}
