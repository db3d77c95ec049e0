mod common;

use asset_monitor::{
    handlers::reports::XLSX_CONTENT_TYPE,
    reports::{CellValue, ReportFilter, ReportSource, NOT_ASSIGNED},
};
use axum::http::{header, StatusCode};
use common::{body_bytes, id_of, json_body, TestApp};
use serde_json::json;
use std::io::{Cursor, Read};

/// XLSX files are zip archives
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// Shared strings table of a rendered workbook
fn workbook_strings(bytes: &[u8]) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut xml = String::new();
    archive
        .by_name("xl/sharedStrings.xml")
        .unwrap()
        .read_to_string(&mut xml)
        .unwrap();
    xml
}

async fn seeded() -> TestApp {
    let app = TestApp::new().await;
    let electronics = app.seed_category("Electronics").await;
    let furniture = app.seed_category("Furniture").await;
    let office = app.seed_location("Main Office").await;
    let serviceable = app.seed_condition("Serviceable").await;
    let user = app
        .create(
            "/api/v1/users",
            json!({ "first_name": "Jane", "last_name": "Doe", "email": "jane@example.com" }),
        )
        .await;

    app.seed_item(
        "Desktop Computer",
        json!({
            "category_id": electronics,
            "location_id": office,
            "condition_id": serviceable,
            "user_id": id_of(&user)
        }),
    )
    .await;
    app.seed_item(
        "Office Chair",
        json!({ "category_id": furniture, "unit_value": "3500" }),
    )
    .await;
    app
}

#[tokio::test]
async fn export_returns_workbook_attachment() {
    let app = seeded().await;

    let response = app
        .get("/api/v1/reports/monitoring-assets?category=Electronics&year=2024")
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        XLSX_CONTENT_TYPE
    );
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"monitoring-assets-2024.xlsx\""
    );

    let bytes = body_bytes(response).await;
    assert!(bytes.starts_with(ZIP_MAGIC));
}

#[tokio::test]
async fn export_with_no_matching_items_still_renders() {
    let app = seeded().await;

    let response = app
        .get("/api/v1/reports/monitoring-assets?category=Vehicles")
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_bytes(response).await.starts_with(ZIP_MAGIC));
}

#[tokio::test]
async fn assembled_rows_resolve_relations() {
    let app = seeded().await;
    let reports = &app.state.services.reports;

    let rows = reports
        .assemble(&ReportSource::Query(ReportFilter {
            category: Some("Electronics".into()),
            location: Some("all".into()),
        }))
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.article, "Desktop Computer");
    assert_eq!(row.category, "Electronics");
    assert_eq!(row.location, "Main Office");
    assert_eq!(row.condition, "Serviceable");
    assert_eq!(row.issued_to, "Jane Doe");
    assert_eq!(row.date_acquired, "2023-07-14");
    assert_eq!(row.quantity, 2);

    let rows = reports
        .assemble(&ReportSource::Query(ReportFilter::default()))
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
    let chair = &rows[1];
    assert_eq!(chair.issued_to, NOT_ASSIGNED);
    assert_eq!(chair.location, "");
    assert_eq!(chair.unit_value, CellValue::Number(3500.0));
}

#[tokio::test]
async fn supplied_rows_are_exported_unfiltered() {
    let app = seeded().await;

    let response = app
        .post(
            "/api/v1/reports/monitoring-assets",
            json!({
                "items": [
                    {
                        "article": "Projector",
                        "propertyAccountCode": "10605070",
                        "unitValue": "28,500.00",
                        "dateAcquired": "2022-02-01",
                        "location": "Conference Room",
                        "category": "Electronics",
                        "issuedTo": "M. Reyes",
                        "quantity": 1
                    },
                    { "unit": "Whiteboard", "unit_value": 1200, "quantity": 3 }
                ],
                "category": "Electronics",
                "location": "Main Office",
                "year": 2025
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"monitoring-assets-2025.xlsx\""
    );
    assert!(body_bytes(response).await.starts_with(ZIP_MAGIC));
}

#[tokio::test]
async fn supplied_rows_accept_numeric_strings_and_numeric_codes() {
    let app = seeded().await;

    let response = app
        .post(
            "/api/v1/reports/monitoring-assets",
            json!({ "items": [{ "article": "Pen", "quantity": "5", "pac": 10605030 }] }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let strings = workbook_strings(&body_bytes(response).await);
    assert!(strings.contains(">Pen<"));
    assert!(strings.contains(">10605030<"));
}

#[tokio::test]
async fn empty_supplied_rows_export_filtered_store() {
    let app = seeded().await;

    let response = app
        .post(
            "/api/v1/reports/monitoring-assets",
            json!({ "items": [], "category": "Furniture", "location": "all", "year": 2025 }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let strings = workbook_strings(&body_bytes(response).await);
    assert!(strings.contains(">Office Chair<"));
    assert!(!strings.contains(">Desktop Computer<"));

    let response = app
        .post(
            "/api/v1/reports/monitoring-assets",
            json!({ "location": "Main Office" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let strings = workbook_strings(&body_bytes(response).await);
    assert!(strings.contains(">Desktop Computer<"));
    assert!(!strings.contains(">Office Chair<"));
}

#[tokio::test]
async fn supplied_rows_must_be_an_array() {
    let app = seeded().await;

    let response = app
        .post(
            "/api/v1/reports/monitoring-assets",
            json!({ "items": "Projector" }),
        )
        .await;
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn health_reports_database_up() {
    let app = TestApp::new().await;

    let response = app.get("/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "up");
    assert_eq!(body["database"], "up");

    let body = json_body(app.get("/status").await).await;
    assert_eq!(body["name"], "asset-monitor");
    assert_eq!(body["environment"], "test");
}

#[tokio::test]
async fn responses_carry_request_id() {
    let app = TestApp::new().await;

    let response = app.get("/api/v1/items/1").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let request_id = response.headers()["x-request-id"]
        .to_str()
        .unwrap()
        .to_string();
    let body = json_body(response).await;
    assert_eq!(body["request_id"], request_id);
}
