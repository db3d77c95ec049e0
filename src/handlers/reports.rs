use crate::{
    errors::ServiceError,
    reports::{ReportFilter, ReportSource, SuppliedRow},
    AppState,
};
use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{Datelike, Utc};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ExportQuery {
    /// Exact category name; also drives the report title
    pub category: Option<String>,
    /// Exact location name, or `all`
    pub location: Option<String>,
    /// Year shown in the title, defaults to the current year
    pub year: Option<i32>,
}

/// Rows supplied by the caller instead of queried from the store. An empty
/// `items` array exports the stored items filtered by `category`/`location`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ExportRequest {
    #[serde(default)]
    #[schema(value_type = Vec<crate::reports::RawRow>)]
    pub items: Vec<SuppliedRow>,
    pub category: Option<String>,
    /// Only applied when `items` is empty
    pub location: Option<String>,
    pub year: Option<i32>,
}

fn attachment(bytes: Vec<u8>, year: i32) -> Response {
    let disposition = format!("attachment; filename=\"monitoring-assets-{}.xlsx\"", year);
    (
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response()
}

#[utoipa::path(
    get,
    path = "/api/v1/reports/monitoring-assets",
    params(ExportQuery),
    responses(
        (status = 200, description = "Monitoring assets workbook", content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
        (status = 500, description = "Report generation failed", body = crate::errors::ErrorResponse)
    ),
    tag = "reports"
)]
pub async fn export_monitoring_assets(
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, ServiceError> {
    let year = query.year.unwrap_or_else(|| Utc::now().year());
    let filter = ReportFilter {
        category: query.category.clone(),
        location: query.location,
    };
    let category = filter.category().map(str::to_string);

    let bytes = state
        .services
        .reports
        .export(&ReportSource::Query(filter), category, year, &state.config.report)
        .await?;
    Ok(attachment(bytes, year))
}

#[utoipa::path(
    post,
    path = "/api/v1/reports/monitoring-assets",
    request_body = ExportRequest,
    responses(
        (status = 200, description = "Monitoring assets workbook built from the supplied rows", content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "reports"
)]
pub async fn export_supplied_rows(
    State(state): State<AppState>,
    Json(request): Json<ExportRequest>,
) -> Result<Response, ServiceError> {
    let year = request.year.unwrap_or_else(|| Utc::now().year());
    let category = request.category.clone().filter(|c| !c.is_empty());
    let source = if request.items.is_empty() {
        ReportSource::Query(ReportFilter {
            category: request.category,
            location: request.location,
        })
    } else {
        ReportSource::Supplied(request.items)
    };

    let bytes = state
        .services
        .reports
        .export(&source, category, year, &state.config.report)
        .await?;
    Ok(attachment(bytes, year))
}
