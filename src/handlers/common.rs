use crate::config::AppConfig;
use crate::errors::ServiceError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Single-resource envelope: `{ "data": ... }`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DataResponse<T> {
    pub data: T,
}

/// Standard success response
pub fn success_response<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(DataResponse { data })).into_response()
}

/// Standard created response
pub fn created_response<T: Serialize>(data: T) -> Response {
    (StatusCode::CREATED, Json(DataResponse { data })).into_response()
}

/// List response with pagination metadata
pub fn paginated_response<T: Serialize>(
    data: Vec<T>,
    page: u64,
    per_page: u64,
    total: u64,
) -> Response {
    (
        StatusCode::OK,
        Json(PaginatedResponse::new(data, page, per_page, total)),
    )
        .into_response()
}

/// Standard no content response
pub fn no_content_response() -> Response {
    StatusCode::NO_CONTENT.into_response()
}

/// Validate request input
pub fn validate_input<T: Validate>(input: &T) -> Result<(), ServiceError> {
    input.validate().map_err(ServiceError::from)
}

/// Pagination parameters for list operations
#[derive(Debug, Default, Deserialize, Serialize, IntoParams)]
pub struct PaginationParams {
    /// 1-based page number (default 1)
    pub page: Option<u64>,
    /// Page size (default from configuration, clamped to the configured max)
    pub per_page: Option<u64>,
}

impl PaginationParams {
    /// Applies configured defaults and bounds, returning `(page, per_page)`
    pub fn resolve(&self, config: &AppConfig) -> (u64, u64) {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self
            .per_page
            .unwrap_or(config.api_default_page_size)
            .clamp(1, config.api_max_page_size.max(1));
        (page, per_page)
    }
}

/// Pagination metadata in the shape the client collections consume
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PaginationMeta {
    pub current_page: u64,
    pub last_page: u64,
    pub per_page: u64,
    pub total: u64,
    /// 1-based index of the first row on this page, `null` when empty
    pub from: Option<u64>,
    pub to: Option<u64>,
}

impl PaginationMeta {
    pub fn new(current_page: u64, per_page: u64, total: u64, count: u64) -> Self {
        let last_page = if total == 0 {
            1
        } else {
            (total + per_page - 1) / per_page
        };
        let offset = current_page.saturating_sub(1) * per_page;
        let (from, to) = if count == 0 {
            (None, None)
        } else {
            (Some(offset + 1), Some(offset + count))
        };
        Self {
            current_page,
            last_page,
            per_page,
            total,
            from,
            to,
        }
    }
}

/// Standard paginated response wrapper
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, page: u64, per_page: u64, total: u64) -> Self {
        let count = data.len() as u64;
        Self {
            data,
            pagination: PaginationMeta::new(page, per_page, total, count),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AppConfig {
        AppConfig::new(
            "sqlite::memory:".into(),
            "127.0.0.1".into(),
            8080,
            "development".into(),
        )
    }

    #[test]
    fn resolve_applies_defaults_and_bounds() {
        let cfg = config();
        assert_eq!(PaginationParams::default().resolve(&cfg), (1, 10));
        let huge = PaginationParams {
            page: Some(0),
            per_page: Some(10_000),
        };
        assert_eq!(huge.resolve(&cfg), (1, 100));
        let zero = PaginationParams {
            page: Some(3),
            per_page: Some(0),
        };
        assert_eq!(zero.resolve(&cfg), (3, 1));
    }

    #[test]
    fn meta_for_middle_page() {
        let meta = PaginationMeta::new(2, 10, 25, 10);
        assert_eq!(meta.last_page, 3);
        assert_eq!(meta.from, Some(11));
        assert_eq!(meta.to, Some(20));
    }

    #[test]
    fn meta_for_partial_last_page() {
        let meta = PaginationMeta::new(3, 10, 25, 5);
        assert_eq!(meta.from, Some(21));
        assert_eq!(meta.to, Some(25));
    }

    #[test]
    fn meta_for_empty_collection() {
        let meta = PaginationMeta::new(1, 10, 0, 0);
        assert_eq!(meta.last_page, 1);
        assert_eq!(meta.from, None);
        assert_eq!(meta.to, None);
    }
}
