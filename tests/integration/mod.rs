//! Integration tests for the users API.
//!
//! The router is driven in-process with `tower::ServiceExt::oneshot`; no
//! socket is opened.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::ServiceExt;

use users_api::api::{create_router, AppState};

fn app() -> Router {
    create_router(AppState::new())
}

async fn send(request: Request<Body>) -> (StatusCode, Value) {
    let response = app().oneshot(request).await.unwrap();
    let status = response.status();

    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(
        content_type.starts_with("application/json"),
        "unexpected content type: {content_type}"
    );

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn get(uri: &str) -> (StatusCode, Value) {
    send(Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

async fn post_json(body: Value) -> (StatusCode, Value) {
    send(
        Request::builder()
            .method(Method::POST)
            .uri("/api/users")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

#[tokio::test]
async fn welcome_returns_message_version_and_timestamp() {
    let (status, body) = get("/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().contains("Welcome"));
    assert_eq!(body["version"], "1.0.0");
    assert!(body["timestamp"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn health_reports_healthy_with_uptime() {
    let (status, body) = get("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert!(body["uptime"].as_f64().unwrap() >= 0.0);
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn list_users_returns_seed_data_in_order() {
    let (status, body) = get("/api/users").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "users": [
                {"id": 1, "name": "John Doe", "email": "john@example.com"},
                {"id": 2, "name": "Jane Smith", "email": "jane@example.com"},
                {"id": 3, "name": "Bob Johnson", "email": "bob@example.com"}
            ]
        })
    );
}

#[tokio::test]
async fn get_user_returns_single_user() {
    let (status, body) = get("/api/users/1").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"user": {"id": 1, "name": "John Doe", "email": "john@example.com"}})
    );
}

#[tokio::test]
async fn get_user_returns_404_for_unknown_id() {
    let (status, body) = get("/api/users/999").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "User not found"}));
}

#[tokio::test]
async fn get_user_returns_404_for_non_numeric_id() {
    let (status, body) = get("/api/users/abc").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "User not found"}));
}

#[tokio::test]
async fn create_user_echoes_input_with_new_id() {
    let (status, body) =
        post_json(json!({"name": "Test User", "email": "test@example.com"})).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "User created successfully");
    assert_eq!(body["user"]["name"], "Test User");
    assert_eq!(body["user"]["email"], "test@example.com");
    assert!(body["user"]["id"].as_i64().unwrap() > 3);
}

#[tokio::test]
async fn create_user_requires_name() {
    let (status, body) = post_json(json!({"email": "test@example.com"})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Name and email are required"}));
}

#[tokio::test]
async fn create_user_requires_email() {
    let (status, body) = post_json(json!({"name": "Test User"})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Name and email are required"}));
}

#[tokio::test]
async fn create_user_accepts_form_bodies() {
    let (status, body) = send(
        Request::builder()
            .method(Method::POST)
            .uri("/api/users")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("name=Form+User&email=form%40example.com"))
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["name"], "Form User");
    assert_eq!(body["user"]["email"], "form@example.com");
}

#[tokio::test]
async fn created_users_do_not_appear_in_listing() {
    let (status, _) = post_json(json!({"name": "Ghost", "email": "ghost@example.com"})).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = get("/api/users").await;
    assert_eq!(body["users"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let (status, body) = get("/unknown-route").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Route not found"}));
}

#[tokio::test]
async fn trailing_slash_reaches_user_listing() {
    let (status, body) = get("/api/users/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["users"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn paths_match_case_insensitively() {
    let (status, body) = get("/HEALTH").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = get("/API/USERS").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["users"][0]["name"], "John Doe");
}

#[tokio::test]
async fn create_user_accepts_truthy_non_string_fields() {
    let (status, body) = post_json(json!({"name": 5, "email": "a@b.c"})).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["name"], 5);
    assert_eq!(body["user"]["email"], "a@b.c");

    let (status, body) = post_json(json!({"name": true, "email": "a@b.c"})).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["name"], true);
}

#[tokio::test]
async fn create_user_rejects_falsy_fields() {
    for name in [json!(0), json!(false), json!(null), json!("")] {
        let (status, body) = post_json(json!({"name": name, "email": "a@b.c"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Name and email are required"}));
    }
}

#[tokio::test]
async fn create_user_accepts_form_arrays() {
    let (status, body) = send(
        Request::builder()
            .method(Method::POST)
            .uri("/api/users")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("name%5B%5D=a&email=a%40b.c"))
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["name"], json!(["a"]));
}

#[tokio::test]
async fn json_primitive_body_is_a_fault() {
    let (status, body) = post_json(json!("x")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Something went wrong!"}));
}

#[tokio::test]
async fn vendor_json_media_type_is_ignored() {
    let (status, body) = send(
        Request::builder()
            .method(Method::POST)
            .uri("/api/users")
            .header(header::CONTENT_TYPE, "application/vnd.api+json")
            .body(Body::from(r#"{"name":"A","email":"a@b.c"}"#))
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Name and email are required"}));
}
