use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::adapters::http::LIVENESS_MESSAGE;
use crate::adapters::router;
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::storage::memory::InMemoryTodoRepository;
use crate::use_cases::TodoUseCases;

fn memory_app() -> Router {
    router(TodoUseCases::new(Arc::new(InMemoryTodoRepository::new())))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Vec<u8>) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(raw) => {
            request = request.header("content-type", "application/json");
            Body::from(raw.to_string())
        }
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

fn json_of(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).unwrap()
}

#[tokio::test]
async fn liveness_route_answers_plain_text() {
    let app = memory_app();
    let (status, body) = send(&app, "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(String::from_utf8(body).unwrap(), LIVENESS_MESSAGE);
}

#[tokio::test]
async fn full_todo_lifecycle() {
    let app = memory_app();

    let (status, body) = send(&app, "POST", "/api/todos", Some(r#"{"task":"Buy milk"}"#)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        json_of(&body),
        json!({"id": "1", "task": "Buy milk", "is_complete": false})
    );

    let (status, body) = send(&app, "GET", "/api/todos", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json_of(&body),
        json!([{"id": "1", "task": "Buy milk", "is_complete": false}])
    );

    let (status, body) = send(&app, "PUT", "/api/todos/1", Some(r#"{"is_complete":true}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_of(&body)["is_complete"], true);

    let (status, body) = send(&app, "DELETE", "/api/todos/1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());

    let (_, body) = send(&app, "GET", "/api/todos", None).await;
    assert_eq!(json_of(&body), json!([]));

    let (status, body) = send(&app, "PUT", "/api/todos/1", Some(r#"{"is_complete":true}"#)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json_of(&body)["error"], "Todo with ID '1' not found.");

    let (status, _) = send(&app, "DELETE", "/api/todos/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_rejects_bad_tasks() {
    let app = memory_app();
    for body in [r#"{"task":""}"#, r#"{}"#, r#"{"task":42}"#, "not json"] {
        let (status, body) = send(&app, "POST", "/api/todos", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json_of(&body)["error"].is_string());
    }

    let (_, body) = send(&app, "GET", "/api/todos", None).await;
    assert_eq!(json_of(&body), json!([]));
}

#[tokio::test]
async fn update_requires_a_boolean_status() {
    let app = memory_app();
    send(&app, "POST", "/api/todos", Some(r#"{"task":"Walk"}"#)).await;

    for body in [r#"{}"#, r#"{"is_complete":"yes"}"#, r#"{"is_complete":null}"#, r#"{"is_complete":1}"#] {
        let (status, body) = send(&app, "PUT", "/api/todos/1", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            json_of(&body)["error"],
            "Missing or invalid 'is_complete' status (must be boolean)."
        );
    }
}

#[tokio::test]
async fn unconfigured_backend_fails_data_routes_only() {
    let context = AppContext::new(AppConfig::default());
    let app = router(TodoUseCases::new(Arc::new(context.todo_repository())));

    let (status, _) = send(&app, "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "GET", "/api/todos", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json_of(&body), json!({"error": "Failed to fetch todo items."}));

    let (status, body) = send(&app, "POST", "/api/todos", Some(r#"{"task":"x"}"#)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json_of(&body), json!({"error": "Failed to create todo item."}));

    let (status, _) = send(&app, "PUT", "/api/todos/1", Some(r#"{"is_complete":true}"#)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (status, _) = send(&app, "DELETE", "/api/todos/1", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn validation_happens_before_the_backend_is_touched() {
    let context = AppContext::new(AppConfig::default());
    let app = router(TodoUseCases::new(Arc::new(context.todo_repository())));

    let (status, _) = send(&app, "POST", "/api/todos", Some(r#"{"task":""}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn oversized_body_keeps_its_413_status() {
    let app = memory_app();
    let task = "x".repeat(3 * 1024 * 1024);
    let payload = json!({ "task": task }).to_string();

    let (status, body) = send(&app, "POST", "/api/todos", Some(&payload)).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(json_of(&body)["error"].is_string());

    let (_, body) = send(&app, "GET", "/api/todos", None).await;
    assert_eq!(json_of(&body), json!([]));
}

#[tokio::test]
async fn undecodable_ids_get_a_json_error() {
    let app = memory_app();

    let (status, body) = send(&app, "PUT", "/api/todos/%FF", Some(r#"{"is_complete":true}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json_of(&body)["error"].is_string());

    let (status, body) = send(&app, "DELETE", "/api/todos/%FF", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json_of(&body)["error"].is_string());
}
