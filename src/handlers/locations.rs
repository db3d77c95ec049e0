use super::common::{
    created_response, no_content_response, paginated_response, success_response,
    validate_input, DataResponse, PaginatedResponse, PaginationParams,
};
use crate::{
    entities::location, errors::ServiceError, services::locations::LocationInput, AppState,
};
use axum::{
    extract::{Path, Query, State},
    response::Response,
    Json,
};

#[utoipa::path(
    get,
    path = "/api/v1/locations",
    params(PaginationParams),
    responses(
        (status = 200, description = "Locations listed", body = PaginatedResponse<location::Model>)
    ),
    tag = "locations"
)]
pub async fn list_locations(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<Response, ServiceError> {
    let (page, per_page) = params.resolve(&state.config);
    let (locations, total) = state.services.locations.list(page, per_page).await?;
    Ok(paginated_response(locations, page, per_page, total))
}

#[utoipa::path(
    get,
    path = "/api/v1/locations/:id",
    params(("id" = i32, Path, description = "Location ID")),
    responses(
        (status = 200, description = "Location fetched", body = DataResponse<location::Model>),
        (status = 404, description = "Location not found", body = crate::errors::ErrorResponse)
    ),
    tag = "locations"
)]
pub async fn get_location(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, ServiceError> {
    Ok(success_response(state.services.locations.get(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/locations",
    request_body = LocationInput,
    responses(
        (status = 201, description = "Location created", body = DataResponse<location::Model>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "locations"
)]
pub async fn create_location(
    State(state): State<AppState>,
    Json(payload): Json<LocationInput>,
) -> Result<Response, ServiceError> {
    validate_input(&payload)?;
    let location = state.services.locations.create(payload).await?;
    Ok(created_response(location))
}

#[utoipa::path(
    put,
    path = "/api/v1/locations/:id",
    params(("id" = i32, Path, description = "Location ID")),
    request_body = LocationInput,
    responses(
        (status = 200, description = "Location updated", body = DataResponse<location::Model>),
        (status = 404, description = "Location not found", body = crate::errors::ErrorResponse)
    ),
    tag = "locations"
)]
pub async fn update_location(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<LocationInput>,
) -> Result<Response, ServiceError> {
    validate_input(&payload)?;
    let location = state.services.locations.update(id, payload).await?;
    Ok(success_response(location))
}

#[utoipa::path(
    delete,
    path = "/api/v1/locations/:id",
    params(("id" = i32, Path, description = "Location ID")),
    responses(
        (status = 204, description = "Location deleted"),
        (status = 404, description = "Location not found", body = crate::errors::ErrorResponse)
    ),
    tag = "locations"
)]
pub async fn delete_location(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, ServiceError> {
    state.services.locations.delete(id).await?;
    Ok(no_content_response())
}
