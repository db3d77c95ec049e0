use super::common::success_response;
use crate::{
    errors::ServiceError,
    services::forecasting::{forecast_batch, parse_batch, BatchForecastError},
    AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use tracing::warn;

#[utoipa::path(
    get,
    path = "/api/v1/items/:id/forecast",
    params(("id" = i32, Path, description = "Item ID")),
    responses(
        (status = 200, description = "Next-quarter usage forecast"),
        (status = 404, description = "Item not found", body = crate::errors::ErrorResponse)
    ),
    tag = "forecasts"
)]
pub async fn forecast_item(
    State(state): State<AppState>,
    Path(item_id): Path<i32>,
) -> Result<Response, ServiceError> {
    let today = Utc::now().date_naive();
    let forecast = state.services.forecasts.forecast_item(item_id, today).await?;
    Ok(success_response(forecast))
}

/// Batch forecast in the forecasting companion's wire format
#[utoipa::path(
    post,
    path = "/api/v1/predict/consumables/linear",
    request_body = crate::services::forecasting::BatchForecastRequest,
    responses(
        (status = 200, description = "Forecasts for every submitted item"),
        (status = 400, description = "Missing items array", body = BatchForecastError)
    ),
    tag = "forecasts"
)]
pub async fn predict_consumables(body: Option<Json<serde_json::Value>>) -> Response {
    let request = match body.map(|Json(value)| parse_batch(value)) {
        Some(Ok(request)) => request,
        Some(Err(error)) => {
            warn!(error = %error.error, "Rejected forecast batch");
            return (StatusCode::BAD_REQUEST, Json(error)).into_response();
        }
        None => {
            return (StatusCode::BAD_REQUEST, Json(BatchForecastError::invalid_format()))
                .into_response()
        }
    };

    let today = Utc::now().date_naive();
    Json(forecast_batch(&request, today)).into_response()
}
