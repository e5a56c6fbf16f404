//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::time::Duration;
use tower::ServiceExt;
use user_cache::{api::create_router, service::MissPolicy, AppState, Config};

// == Helper Functions ==

fn create_test_app() -> Router {
    create_app_with(Config::default())
}

fn create_app_with(config: Config) -> Router {
    let state = AppState::from_config(&config).unwrap();
    create_router(state)
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn list_ids(app: &Router) -> Vec<Value> {
    let (status, json) = send(app, empty_request("GET", "/user/list")).await;
    assert_eq!(status, StatusCode::OK);
    let mut ids: Vec<Value> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|user| user["id"].clone())
        .collect();
    ids.sort_by_key(|id| id.as_i64());
    ids
}

// == Create Endpoint Tests ==

#[tokio::test]
async fn test_v2_add_returns_stored_record() {
    let app = create_test_app();

    let (status, json) = send(
        &app,
        json_request(
            "POST",
            "/user/v2/add",
            json!({"id": 1, "name": "A", "isMale": true}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        json!({"id": 1, "name": "A", "isMale": true, "imageName": null})
    );
}

#[tokio::test]
async fn test_v2_add_without_id_is_bad_request() {
    let app = create_test_app();

    let (status, json) = send(
        &app,
        json_request("POST", "/user/v2/add", json!({"name": "nobody"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("id"));
    assert!(list_ids(&app).await.is_empty());
}

#[tokio::test]
async fn test_add_replaces_existing_record() {
    let app = create_test_app();

    send(&app, json_request("POST", "/user/v2/add", json!({"id": 1, "name": "A"}))).await;
    send(&app, json_request("POST", "/user/v2/add", json!({"id": 1, "name": "Z"}))).await;

    let (_, json) = send(&app, empty_request("GET", "/user/list")).await;
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["name"], "Z");
}

// == List / Delete Scenario ==

#[tokio::test]
async fn test_list_delete_scenario() {
    let app = create_test_app();

    send(&app, json_request("POST", "/user/v2/add", json!({"id": 1, "name": "A"}))).await;
    send(&app, json_request("POST", "/user/v2/add", json!({"id": 2, "name": "B"}))).await;
    assert_eq!(list_ids(&app).await, vec![json!(1), json!(2)]);

    let (status, removed) = send(&app, empty_request("DELETE", "/user/1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(removed["name"], "A");
    assert_eq!(list_ids(&app).await, vec![json!(2)]);

    // Deleting again yields the empty sentinel
    let (status, removed) = send(&app, empty_request("DELETE", "/user/1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        removed,
        json!({"id": null, "name": null, "isMale": null, "imageName": null})
    );
}

// == Update Endpoint Tests ==

#[tokio::test]
async fn test_update_merges_and_stores() {
    let app = create_test_app();
    send(
        &app,
        json_request(
            "POST",
            "/user/v2/add",
            json!({"id": 3, "name": "C", "isMale": false, "imageName": "c.png"}),
        ),
    )
    .await;

    let (status, merged) = send(
        &app,
        json_request("PUT", "/user/update", json!({"id": 3, "name": "Carol"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(merged["name"], "Carol");
    assert_eq!(merged["imageName"], "c.png");

    let (_, listed) = send(&app, empty_request("GET", "/user/list")).await;
    assert_eq!(listed[0], merged);
}

#[tokio::test]
async fn test_update_unknown_id_under_sentinel_policy_creates_record() {
    let app = create_test_app();

    let (status, merged) = send(
        &app,
        json_request("PUT", "/user/update", json!({"id": 9, "isMan": true})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(merged, json!({"id": 9, "name": null, "isMale": true, "imageName": null}));
    assert_eq!(list_ids(&app).await, vec![json!(9)]);
}

#[tokio::test]
async fn test_update_unknown_id_under_absent_policy_is_not_found() {
    let app = create_app_with(Config {
        miss_policy: MissPolicy::Absent,
        ..Config::default()
    });

    let (status, json) = send(
        &app,
        json_request("PUT", "/user/update", json!({"id": 9, "name": "x"})),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json.get("error").is_some());
    assert!(list_ids(&app).await.is_empty());
}

#[tokio::test]
async fn test_update_malformed_json() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/user/update")
                .header("content-type", "application/json")
                .body(Body::from("{invalid json}"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

// == Capacity and Expiry ==

#[tokio::test]
async fn test_oldest_record_evicted_at_capacity() {
    let app = create_app_with(Config {
        max_entries: 2,
        ..Config::default()
    });

    for id in 1..=3 {
        send(&app, json_request("POST", "/user/v2/add", json!({"id": id}))).await;
    }

    assert_eq!(list_ids(&app).await, vec![json!(2), json!(3)]);

    let (_, stats) = send(&app, empty_request("GET", "/stats")).await;
    assert_eq!(stats["evictions"], 1);
}

#[tokio::test]
async fn test_idle_record_disappears_from_list() {
    let app = create_app_with(Config {
        expire_after_access: 1,
        ..Config::default()
    });

    send(&app, json_request("POST", "/user/v2/add", json!({"id": 1}))).await;
    assert_eq!(list_ids(&app).await, vec![json!(1)]);

    tokio::time::sleep(Duration::from_millis(1100)).await;

    assert!(list_ids(&app).await.is_empty());
}

// == STATS / HEALTH Endpoint Tests ==

#[tokio::test]
async fn test_stats_endpoint_reflects_operations() {
    let app = create_test_app();

    send(&app, json_request("POST", "/user/v2/add", json!({"id": 1}))).await;
    send(&app, json_request("PUT", "/user/update", json!({"id": 1, "name": "A"}))).await;
    send(&app, json_request("PUT", "/user/update", json!({"id": 2, "name": "B"}))).await;

    let (status, stats) = send(&app, empty_request("GET", "/stats")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["hits"], 1);
    assert_eq!(stats["misses"], 1);
    assert_eq!(stats["loads"], 1);
    assert_eq!(stats["total_entries"], 2);
    assert!(stats["hit_rate"].is_number());
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();

    let (status, json) = send(&app, empty_request("GET", "/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert!(json.get("timestamp").is_some());
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = create_test_app();

    let response = app.oneshot(empty_request("GET", "/users")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
