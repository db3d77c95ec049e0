use super::common::{created_response, success_response, validate_input, DataResponse};
use crate::{
    entities::maintenance_record,
    errors::ServiceError,
    services::maintenance::{MaintenanceRecorded, RecordMaintenanceInput},
    AppState,
};
use axum::{
    extract::{Path, State},
    response::Response,
    Json,
};

#[utoipa::path(
    get,
    path = "/api/v1/items/:id/maintenance",
    params(("id" = i32, Path, description = "Item ID")),
    responses(
        (status = 200, description = "Maintenance history, newest first", body = DataResponse<Vec<maintenance_record::Model>>),
        (status = 404, description = "Item not found", body = crate::errors::ErrorResponse)
    ),
    tag = "maintenance"
)]
pub async fn list_maintenance(
    State(state): State<AppState>,
    Path(item_id): Path<i32>,
) -> Result<Response, ServiceError> {
    let records = state.services.maintenance.list_for_item(item_id).await?;
    Ok(success_response(records))
}

/// Records maintenance and increments the item's maintenance count
#[utoipa::path(
    post,
    path = "/api/v1/items/:id/maintenance",
    params(("id" = i32, Path, description = "Item ID")),
    request_body = RecordMaintenanceInput,
    responses(
        (status = 201, description = "Maintenance recorded", body = DataResponse<MaintenanceRecorded>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Item or condition not found", body = crate::errors::ErrorResponse)
    ),
    tag = "maintenance"
)]
pub async fn record_maintenance(
    State(state): State<AppState>,
    Path(item_id): Path<i32>,
    Json(payload): Json<RecordMaintenanceInput>,
) -> Result<Response, ServiceError> {
    validate_input(&payload)?;
    let recorded = state.services.maintenance.record(item_id, payload).await?;
    Ok(created_response(recorded))
}
