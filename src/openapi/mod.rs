use axum::Json;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Asset Monitor API",
        version = "0.1.0",
        description = r#"
# Asset Monitor API

Inventory of tracked physical assets with maintenance history, quarterly
supply usage, usage forecasting and the monitoring-assets Excel export.

## Pagination

List endpoints accept `page` (default 1) and `per_page` (default 10, max 100)
and respond with `{ "data": [...], "pagination": { current_page, last_page,
per_page, total, from, to } }`.

## Errors

Failures use one body shape:

```json
{
  "error": "Not Found",
  "message": "Not found: Item 42 not found",
  "request_id": "5f0c...",
  "timestamp": "2025-01-01T00:00:00Z"
}
```
        "#,
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    paths(
        crate::handlers::health::health,
        crate::handlers::health::status,
        crate::handlers::categories::list_categories,
        crate::handlers::categories::get_category,
        crate::handlers::categories::create_category,
        crate::handlers::categories::update_category,
        crate::handlers::categories::delete_category,
        crate::handlers::locations::list_locations,
        crate::handlers::locations::get_location,
        crate::handlers::locations::create_location,
        crate::handlers::locations::update_location,
        crate::handlers::locations::delete_location,
        crate::handlers::conditions::list_conditions,
        crate::handlers::conditions::create_condition,
        crate::handlers::conditions::update_condition,
        crate::handlers::conditions::delete_condition,
        crate::handlers::users::list_users,
        crate::handlers::users::get_user,
        crate::handlers::users::create_user,
        crate::handlers::users::delete_user,
        crate::handlers::items::list_items,
        crate::handlers::items::get_item,
        crate::handlers::items::create_item,
        crate::handlers::items::update_item,
        crate::handlers::items::delete_item,
        crate::handlers::maintenance::list_maintenance,
        crate::handlers::maintenance::record_maintenance,
        crate::handlers::usages::usage_history,
        crate::handlers::usages::record_usage,
        crate::handlers::forecasts::forecast_item,
        crate::handlers::forecasts::predict_consumables,
        crate::handlers::reports::export_monitoring_assets,
        crate::handlers::reports::export_supplied_rows,
    ),
    components(schemas(
        crate::errors::ErrorResponse,
        crate::handlers::common::PaginationMeta,
        crate::entities::MaintenanceReason,
        crate::entities::item::Model,
        crate::entities::maintenance_record::Model,
        crate::reports::RawRow,
        crate::reports::RawValue,
        crate::services::forecasting::ForecastMethod,
    )),
    tags(
        (name = "health", description = "Liveness and build information"),
        (name = "categories", description = "Item categories"),
        (name = "locations", description = "Locations and their personnel"),
        (name = "conditions", description = "Physical condition labels"),
        (name = "users", description = "People items are issued to"),
        (name = "items", description = "Tracked assets"),
        (name = "maintenance", description = "Maintenance history"),
        (name = "usages", description = "Quarterly supply usage"),
        (name = "forecasts", description = "Next-quarter usage forecasts"),
        (name = "reports", description = "Spreadsheet exports")
    )
)]
pub struct ApiDoc;

/// Serves the generated OpenAPI document
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
