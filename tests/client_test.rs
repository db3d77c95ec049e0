use std::time::Duration;

use asset_monitor::client::{ApiClient, ClientError, ResourceCollection};
use assert_matches::assert_matches;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use wiremock::{
    matchers::{body_json, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Category {
    id: i32,
    name: String,
}

fn page(names: &[(i32, &str)], current_page: u64, per_page: u64, total: u64) -> Value {
    let data: Vec<Value> = names
        .iter()
        .map(|(id, name)| json!({ "id": id, "name": name }))
        .collect();
    let count = data.len() as u64;
    let offset = (current_page - 1) * per_page;
    json!({
        "data": data,
        "pagination": {
            "current_page": current_page,
            "last_page": ((total + per_page - 1) / per_page).max(1),
            "per_page": per_page,
            "total": total,
            "from": if count == 0 { Value::Null } else { json!(offset + 1) },
            "to": if count == 0 { Value::Null } else { json!(offset + count) }
        }
    })
}

fn categories(server: &MockServer) -> ResourceCollection<Category> {
    ResourceCollection::new(ApiClient::new(server.uri()), "/categories")
}

#[tokio::test]
async fn fetch_replaces_items_and_pagination() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/categories"))
        .and(query_param("page", "1"))
        .and(query_param("per_page", "10"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page(&[(1, "Electronics"), (2, "Furniture")], 1, 10, 2)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let collection = categories(&server);
    collection.fetch(1, 10).await;

    let snapshot = collection.snapshot().await;
    assert_eq!(snapshot.items.len(), 2);
    assert_eq!(snapshot.items[0].name, "Electronics");
    assert_eq!(snapshot.pagination.total, 2);
    assert_eq!(snapshot.pagination.to, Some(2));
    assert!(!snapshot.loading);
}

#[tokio::test]
async fn create_refetches_current_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(&[], 1, 10, 0)))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/categories"))
        .and(body_json(json!({ "name": "Vehicles" })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({ "data": { "id": 7, "name": "Vehicles" } })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let collection = categories(&server);
    collection.fetch(1, 10).await;
    assert_eq!(collection.pagination().await.total, 0);

    Mock::given(method("GET"))
        .and(path("/api/v1/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(&[(7, "Vehicles")], 1, 10, 1)))
        .mount(&server)
        .await;

    let created = collection
        .create(&json!({ "name": "Vehicles" }))
        .await
        .unwrap();
    assert_eq!(
        created,
        Category {
            id: 7,
            name: "Vehicles".into()
        }
    );

    let snapshot = collection.snapshot().await;
    assert_eq!(snapshot.pagination.total, 1);
    assert_eq!(snapshot.items, vec![created]);
}

#[tokio::test]
async fn stale_response_does_not_overwrite_newer_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/categories"))
        .and(query_param("page", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page(&[(1, "Electronics")], 1, 1, 2))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/categories"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(&[(2, "Furniture")], 2, 1, 2)))
        .mount(&server)
        .await;

    let collection = categories(&server);
    // The page-1 fetch is issued first but answers last.
    tokio::join!(collection.fetch(1, 1), collection.fetch(2, 1));

    let snapshot = collection.snapshot().await;
    assert_eq!(snapshot.pagination.current_page, 2);
    assert_eq!(snapshot.items[0].name, "Furniture");
    assert!(!snapshot.loading);
}

#[tokio::test]
async fn loading_is_set_while_fetch_is_in_flight() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/categories"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page(&[], 1, 10, 0))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;

    let collection = categories(&server);
    let background = collection.clone();
    let task = tokio::spawn(async move { background.fetch(1, 10).await });

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(collection.loading());

    task.await.unwrap();
    assert!(!collection.loading());
}

#[tokio::test]
async fn failed_fetch_keeps_previous_state() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/categories"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(&[(1, "Electronics")], 1, 10, 1)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/categories"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let collection = categories(&server);
    collection.fetch(1, 10).await;
    collection.fetch(2, 10).await;

    let snapshot = collection.snapshot().await;
    assert_eq!(snapshot.pagination.current_page, 1);
    assert_eq!(snapshot.items.len(), 1);
    assert!(!snapshot.loading);
}

#[tokio::test]
async fn failed_mutation_is_returned_without_refetch() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/categories/9"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "error": "Not Found", "message": "Not found: Category 9 not found" })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(&[], 1, 10, 0)))
        .expect(0)
        .mount(&server)
        .await;

    let collection = categories(&server);
    let err = collection.delete(9).await.unwrap_err();
    assert_matches!(err, ClientError::Status { status: 404, ref body } if body.contains("Category 9"));
}

#[tokio::test]
async fn update_sends_put_to_resource_path() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/v1/categories/3"))
        .and(body_json(json!({ "name": "Office Supplies" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "data": { "id": 3, "name": "Office Supplies" } })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(&[(3, "Office Supplies")], 1, 10, 1)))
        .mount(&server)
        .await;

    let collection = categories(&server);
    let updated = collection
        .update(3, &json!({ "name": "Office Supplies" }))
        .await
        .unwrap();
    assert_eq!(updated.name, "Office Supplies");
    assert_eq!(collection.items().await, vec![updated]);
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let client = ApiClient::new("http://127.0.0.1:1");
    let err = client
        .list::<Category>("/categories", 1, 10)
        .await
        .unwrap_err();
    assert_matches!(err, ClientError::Transport(_));
}
