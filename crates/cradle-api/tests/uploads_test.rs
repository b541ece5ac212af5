//! Upload, static file, health and documentation endpoint tests.
//!
//! Run with: `cargo test -p cradle-api --test uploads_test`

mod helpers;

use helpers::auth::register_business;
use helpers::{api_path, fixtures, setup_test_app, TEST_BASE_URL};
use serde_json::{json, Value};

#[tokio::test]
async fn test_upload_image_and_fetch_it_back() {
    let app = setup_test_app().await;
    let business = register_business(&app, "owner@acme.test").await;

    let response = app
        .client()
        .post(&api_path("/uploads"))
        .add_header("Authorization", business.bearer())
        .json(&json!({ "base64_file": fixtures::PNG_DATA_URI }))
        .await;

    assert_eq!(response.status_code(), 201);
    let data = response.json::<Value>()["data"].clone();
    let key = data["key"].as_str().unwrap();
    let url = data["url"].as_str().unwrap();
    assert!(key.starts_with("uploads/"));
    assert!(key.ends_with(".png"));

    let local_path = url
        .strip_prefix(TEST_BASE_URL.trim_end_matches("/uploads"))
        .unwrap();
    let response = app.client().get(local_path).await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(&response.as_bytes()[1..4], b"PNG");
}

#[tokio::test]
async fn test_upload_rejects_non_images() {
    let app = setup_test_app().await;
    let business = register_business(&app, "owner@acme.test").await;

    let response = app
        .client()
        .post(&api_path("/uploads"))
        .add_header("Authorization", business.bearer())
        .json(&json!({ "base64_file": fixtures::CSV_DATA_URI }))
        .await;

    assert_eq!(response.status_code(), 400);
    assert_eq!(app.storage.uploads(), 0);
}

#[tokio::test]
async fn test_upload_requires_authentication() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post(&api_path("/uploads"))
        .json(&json!({ "base64_file": fixtures::PNG_DATA_URI }))
        .await;

    assert_eq!(response.status_code(), 401);
}

#[tokio::test]
async fn test_health_and_liveness() {
    let app = setup_test_app().await;

    let response = app.client().get("/live").await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(response.json::<Value>()["status"], "alive");

    let response = app.client().get("/health").await;
    assert_eq!(response.status_code(), 200);
    let body = response.json::<Value>();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "not_configured");
    assert_eq!(body["storage"], "healthy");
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = setup_test_app().await;

    let response = app.client().get("/api/openapi.json").await;

    assert_eq!(response.status_code(), 200);
    let spec = response.json::<Value>();
    assert!(spec["paths"]["/api/v1/request_analytics"].is_object());
    assert!(spec["components"]["securitySchemes"]["bearer_auth"].is_object());
}

#[tokio::test]
async fn test_responses_carry_request_id_and_security_headers() {
    let app = setup_test_app().await;

    let response = app.client().get("/live").await;

    assert!(response.maybe_header("x-request-id").is_some());
    assert_eq!(response.header("x-content-type-options"), "nosniff");
}
