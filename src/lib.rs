//! Asset Monitor
//!
//! Inventory backend for tracked physical assets: CRUD over items and their
//! reference data, maintenance history, quarterly supply usage with
//! next-quarter forecasting, and the monitoring-assets Excel export.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod client;
pub mod common;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod middleware_helpers;
pub mod migrator;
pub mod openapi;
pub mod reports;
pub mod services;
pub mod tracing;

use axum::{
    routing::{get, post},
    Router,
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::compression::CompressionLayer;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub services: handlers::AppServices,
}

impl AppState {
    /// Builds the state and every service over one shared pool
    pub fn new(db: Arc<DatabaseConnection>, config: config::AppConfig) -> Self {
        let services = handlers::AppServices::new(db.clone());
        Self {
            db,
            config,
            services,
        }
    }
}

/// Routes mounted under `/api/v1`
pub fn api_v1_routes() -> Router<AppState> {
    use handlers::{
        categories, conditions, forecasts, items, locations, maintenance, reports, usages, users,
    };

    let reference_data = Router::new()
        .route(
            "/categories",
            get(categories::list_categories).post(categories::create_category),
        )
        .route(
            "/categories/:id",
            get(categories::get_category)
                .put(categories::update_category)
                .delete(categories::delete_category),
        )
        .route(
            "/locations",
            get(locations::list_locations).post(locations::create_location),
        )
        .route(
            "/locations/:id",
            get(locations::get_location)
                .put(locations::update_location)
                .delete(locations::delete_location),
        )
        .route(
            "/conditions",
            get(conditions::list_conditions).post(conditions::create_condition),
        )
        .route(
            "/conditions/:id",
            axum::routing::put(conditions::update_condition).delete(conditions::delete_condition),
        )
        .route("/users", get(users::list_users).post(users::create_user))
        .route("/users/:id", get(users::get_user).delete(users::delete_user));

    let inventory = Router::new()
        .route("/items", get(items::list_items).post(items::create_item))
        .route(
            "/items/:id",
            get(items::get_item)
                .put(items::update_item)
                .delete(items::delete_item),
        )
        .route(
            "/items/:id/maintenance",
            get(maintenance::list_maintenance).post(maintenance::record_maintenance),
        )
        .route("/items/:id/usages", get(usages::usage_history))
        .route("/usages", post(usages::record_usage))
        .route("/items/:id/forecast", get(forecasts::forecast_item))
        .route(
            "/predict/consumables/linear",
            post(forecasts::predict_consumables),
        );

    let reporting = Router::new().route(
        "/reports/monitoring-assets",
        get(reports::export_monitoring_assets).post(reports::export_supplied_rows),
    );

    reference_data.merge(inventory).merge(reporting)
}

/// Full application router: health, the v1 API and the OpenAPI document,
/// wrapped in tracing, compression and request-id layers. CORS is left to
/// the caller.
pub fn app_router(state: AppState) -> Router {
    Router::<AppState>::new()
        .route("/", get(|| async { "asset-monitor up" }))
        .route("/health", get(handlers::health::health))
        .route("/status", get(handlers::health::status))
        .route("/api-docs/openapi.json", get(openapi::openapi_json))
        .nest("/api/v1", api_v1_routes())
        .layer(crate::tracing::configure_http_tracing())
        .layer(CompressionLayer::new())
        .layer(axum::middleware::from_fn(
            middleware_helpers::request_id_middleware,
        ))
        .with_state(state)
}
