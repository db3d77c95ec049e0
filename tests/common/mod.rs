#![allow(dead_code)]

use std::sync::Arc;

use asset_monitor::{config::AppConfig, db, AppState};
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

/// Application router over a fresh in-memory SQLite database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

impl TestApp {
    pub async fn new() -> Self {
        let mut cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        cfg.cors_allow_any_origin = true;
        // Every in-memory connection is its own database.
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;
        cfg.report.logo_path = "tests/fixtures/missing-logo.png".to_string();

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let state = AppState::new(Arc::new(pool), cfg);
        let router = asset_monitor::app_router(state.clone());

        Self { router, state }
    }

    /// Sends one request through the full router stack.
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    pub async fn get(&self, uri: &str) -> Response {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> Response {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> Response {
        self.request(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> Response {
        self.request(Method::DELETE, uri, None).await
    }

    /// POSTs `body` and returns the `data` of the 201 envelope.
    pub async fn create(&self, uri: &str, body: Value) -> Value {
        let response = self.post(uri, body).await;
        assert_eq!(response.status(), StatusCode::CREATED, "POST {uri}");
        json_body(response).await["data"].clone()
    }

    pub async fn seed_category(&self, name: &str) -> i64 {
        id_of(&self.create("/api/v1/categories", json!({ "name": name })).await)
    }

    pub async fn seed_location(&self, name: &str) -> i64 {
        id_of(
            &self
                .create(
                    "/api/v1/locations",
                    json!({ "name": name, "personnel": "Records Officer" }),
                )
                .await,
        )
    }

    pub async fn seed_condition(&self, label: &str) -> i64 {
        id_of(&self.create("/api/v1/conditions", json!({ "label": label })).await)
    }

    /// Creates an item; `extra` fields override the defaults.
    pub async fn seed_item(&self, unit: &str, extra: Value) -> Value {
        let mut body = json!({
            "unit": unit,
            "description": "Core i5, 8GB",
            "pac": "10605030",
            "unit_value": "45999.50",
            "date_acquired": "2023-07-14",
            "po_number": "PO-2023-118",
            "quantity": 2
        });
        if let (Some(target), Value::Object(fields)) = (body.as_object_mut(), extra) {
            target.extend(fields);
        }
        self.create("/api/v1/items", body).await
    }
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read response body")
        .to_vec()
}

pub async fn json_body(response: Response) -> Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).expect("response body is not JSON")
}

pub fn id_of(value: &Value) -> i64 {
    value["id"].as_i64().expect("resource has an integer id")
}
