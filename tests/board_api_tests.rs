use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::{sync::Arc, time::Duration};
use tower::ServiceExt;

use board_api::{create_router, InMemoryBoardRepository};

fn create_test_app() -> Router {
    create_router(Arc::new(InMemoryBoardRepository::new()), Duration::from_secs(5))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, String) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn send_json(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, text) = send(app, method, uri, body).await;
    let value = serde_json::from_str(&text).unwrap_or(Value::Null);
    (status, value)
}

fn new_board() -> Value {
    json!({"name": "kim", "title": "hello", "content": "first post"})
}

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app();

    let (status, body) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");
}

#[tokio::test]
async fn test_board_lifecycle() {
    let app = create_test_app();

    let (status, created) = send_json(&app, "POST", "/api/boards", Some(new_board())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created, json!({"id": 1, "name": "kim", "title": "hello", "content": "first post"}));

    let (status, fetched) = send_json(&app, "GET", "/api/boards/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, updated) = send_json(
        &app,
        "PUT",
        "/api/boards/1",
        Some(json!({"title": "edited"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated, json!({"id": 1, "name": "kim", "title": "edited", "content": "first post"}));

    let (status, _) = send(&app, "DELETE", "/api/boards/1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, "GET", "/api/boards/1", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"message":"Board with id 1 not found"}"#);
}

#[tokio::test]
async fn test_list_boards_newest_first() {
    let app = create_test_app();

    for title in ["one", "two"] {
        let body = json!({"name": "kim", "title": title, "content": "body"});
        let (status, _) = send_json(&app, "POST", "/api/boards", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, boards) = send_json(&app, "GET", "/api/boards", None).await;

    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = boards
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["two", "one"]);
}

#[tokio::test]
async fn test_missing_board_is_bad_request_not_404() {
    let app = create_test_app();

    for method in ["GET", "DELETE"] {
        let (status, body) = send(&app, method, "/api/boards/42", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, r#"{"message":"Board with id 42 not found"}"#);
    }

    let (status, body) = send(&app, "PUT", "/api/boards/42", Some(json!({"title": "x"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"message":"Board with id 42 not found"}"#);
}

#[tokio::test]
async fn test_validation_failure_message() {
    let app = create_test_app();

    let body = json!({"name": "kim", "title": "   ", "content": "body"});
    let (status, text) = send(&app, "POST", "/api/boards", Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(text, r#"{"message":"title : must not be blank, "}"#);
}

#[tokio::test]
async fn test_validation_failure_lists_every_field_in_order() {
    let app = create_test_app();

    let body = json!({"name": "", "title": "", "content": ""});
    let (status, value) = send_json(&app, "POST", "/api/boards", Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        value["message"],
        "name : must not be blank, title : must not be blank, content : must not be blank, "
    );
}

#[tokio::test]
async fn test_invalid_path_id() {
    let app = create_test_app();

    let (status, body) = send(&app, "GET", "/api/boards/0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"message":"Board id must be positive"}"#);

    let (status, body) = send(&app, "GET", "/api/boards/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"message":"Board id must be an integer: abc"}"#);
}

#[tokio::test]
async fn test_empty_update_is_invalid_argument() {
    let app = create_test_app();
    send_json(&app, "POST", "/api/boards", Some(new_board())).await;

    let (status, body) = send(&app, "PUT", "/api/boards/1", Some(json!({}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"message":"No fields to update"}"#);
}

#[tokio::test]
async fn test_malformed_json_is_invalid_argument() {
    let app = create_test_app();

    let (status, value) = send_json(&app, "POST", "/api/boards", Some(json!({"name": "kim"}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(value["message"].is_string());
}

#[tokio::test]
async fn test_error_bodies_are_stable_across_calls() {
    let app = create_test_app();
    let body = json!({"name": "kim", "title": "", "content": "body"});

    let first = send(&app, "POST", "/api/boards", Some(body.clone())).await;
    let second = send(&app, "POST", "/api/boards", Some(body)).await;

    assert_eq!(first, second);
}
