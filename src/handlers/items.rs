use super::common::{
    created_response, no_content_response, paginated_response, success_response,
    validate_input, PaginationParams,
};
use crate::{
    errors::ServiceError,
    reports::ReportFilter,
    services::items::{CreateItemInput, UpdateItemInput},
    AppState,
};
use axum::{
    extract::{Path, Query, State},
    response::Response,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

/// Paging plus the same name filters the monitoring report uses
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ItemListQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    /// Exact category name
    pub category: Option<String>,
    /// Exact location name; `all` disables the filter
    pub location: Option<String>,
}

impl ItemListQuery {
    fn split(self) -> (PaginationParams, ReportFilter) {
        (
            PaginationParams {
                page: self.page,
                per_page: self.per_page,
            },
            ReportFilter {
                category: self.category,
                location: self.location,
            },
        )
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/items",
    params(ItemListQuery),
    responses(
        (status = 200, description = "Items listed with their relations")
    ),
    tag = "items"
)]
pub async fn list_items(
    State(state): State<AppState>,
    Query(query): Query<ItemListQuery>,
) -> Result<Response, ServiceError> {
    let (paging, filter) = query.split();
    let (page, per_page) = paging.resolve(&state.config);
    let (items, total) = state.services.items.list(&filter, page, per_page).await?;
    Ok(paginated_response(items, page, per_page, total))
}

#[utoipa::path(
    get,
    path = "/api/v1/items/:id",
    params(("id" = i32, Path, description = "Item ID")),
    responses(
        (status = 200, description = "Item fetched with its relations"),
        (status = 404, description = "Item not found", body = crate::errors::ErrorResponse)
    ),
    tag = "items"
)]
pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, ServiceError> {
    Ok(success_response(state.services.items.get(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/items",
    request_body = CreateItemInput,
    responses(
        (status = 201, description = "Item created"),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Referenced row not found", body = crate::errors::ErrorResponse)
    ),
    tag = "items"
)]
pub async fn create_item(
    State(state): State<AppState>,
    Json(payload): Json<CreateItemInput>,
) -> Result<Response, ServiceError> {
    validate_input(&payload)?;
    let item = state.services.items.create(payload).await?;
    Ok(created_response(item))
}

#[utoipa::path(
    put,
    path = "/api/v1/items/:id",
    params(("id" = i32, Path, description = "Item ID")),
    request_body = UpdateItemInput,
    responses(
        (status = 200, description = "Item updated"),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Item not found", body = crate::errors::ErrorResponse)
    ),
    tag = "items"
)]
pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateItemInput>,
) -> Result<Response, ServiceError> {
    validate_input(&payload)?;
    let item = state.services.items.update(id, payload).await?;
    Ok(success_response(item))
}

#[utoipa::path(
    delete,
    path = "/api/v1/items/:id",
    params(("id" = i32, Path, description = "Item ID")),
    responses(
        (status = 204, description = "Item deleted"),
        (status = 404, description = "Item not found", body = crate::errors::ErrorResponse)
    ),
    tag = "items"
)]
pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, ServiceError> {
    state.services.items.delete(id).await?;
    Ok(no_content_response())
}
