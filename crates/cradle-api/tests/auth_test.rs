//! Auth API integration tests: sign-up, OTP verification, sign-in and token checks.
//!
//! Run with: `cargo test -p cradle-api --test auth_test`

mod helpers;

use chrono::{Duration, Utc};
use cradle_db::UserRepository;
use helpers::auth::{create_admin, register_business, sign_in, stored_otp};
use helpers::{api_path, fixtures, setup_test_app};
use serde_json::{json, Value};

#[tokio::test]
async fn test_sign_up_creates_unverified_business_and_sends_otp() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post(&api_path("/auth/sign_up"))
        .json(&fixtures::sign_up_body("owner@acme.test"))
        .await;

    assert_eq!(response.status_code(), 201);
    let body = response.json::<Value>();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["role"], "business");
    assert_eq!(body["data"]["is_verified"], false);
    assert!(body["data"].get("password_hash").is_none());
    assert!(body["data"].get("otp").is_none());

    let otp = stored_otp(&app, "owner@acme.test").await;
    assert_eq!(otp.len(), 4);
    let sent = app.mailer.sent_to("owner@acme.test");
    assert_eq!(sent.len(), 1);
    assert!(sent[0].body.contains(&otp));
}

#[tokio::test]
async fn test_sign_up_duplicate_email_conflicts() {
    let app = setup_test_app().await;
    register_business(&app, "owner@acme.test").await;

    let response = app
        .client()
        .post(&api_path("/auth/sign_up"))
        .json(&fixtures::sign_up_body("owner@acme.test"))
        .await;

    assert_eq!(response.status_code(), 409);
    assert_eq!(response.json::<Value>()["message"], "Email already registered");
}

#[tokio::test]
async fn test_sign_up_rejects_weak_password() {
    let app = setup_test_app().await;
    let mut body = fixtures::sign_up_body("owner@acme.test");
    body["password"] = json!("password");

    let response = app.client().post(&api_path("/auth/sign_up")).json(&body).await;

    assert_eq!(response.status_code(), 400);
    assert_eq!(response.json::<Value>()["success"], false);
    assert_eq!(app.storage.uploads(), 0);
}

#[tokio::test]
async fn test_sign_up_with_non_image_profile_is_rejected_before_upload() {
    let app = setup_test_app().await;
    let mut body = fixtures::sign_up_body("owner@acme.test");
    body["user_img"] = json!(fixtures::CSV_DATA_URI);

    let response = app.client().post(&api_path("/auth/sign_up")).json(&body).await;

    assert_eq!(response.status_code(), 400);
    assert_eq!(app.storage.uploads(), 0);
    assert!(app.users.find_by_email("owner@acme.test").await.unwrap().is_none());
}

#[tokio::test]
async fn test_sign_in_requires_verification() {
    let app = setup_test_app().await;
    app.client()
        .post(&api_path("/auth/sign_up"))
        .json(&fixtures::sign_up_body("owner@acme.test"))
        .await;

    let response = app
        .client()
        .post(&api_path("/auth/sign_in"))
        .json(&json!({ "email": "owner@acme.test", "password": fixtures::TEST_PASSWORD }))
        .await;

    assert_eq!(response.status_code(), 401);
    assert_eq!(
        response.json::<Value>()["message"],
        "Please verify your email before signing in"
    );
}

#[tokio::test]
async fn test_verify_otp_then_sign_in() {
    let app = setup_test_app().await;
    let business = register_business(&app, "owner@acme.test").await;

    let body = sign_in(&app, "owner@acme.test", fixtures::TEST_PASSWORD).await;
    assert_eq!(body["data"]["token_type"], "Bearer");
    assert_eq!(body["data"]["expires_in"], 30 * 60);
    assert_eq!(body["data"]["user"]["is_verified"], true);

    let response = app
        .client()
        .get(&api_path("/auth/me"))
        .add_header("Authorization", business.bearer())
        .await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(response.json::<Value>()["data"]["email"], "owner@acme.test");
}

#[tokio::test]
async fn test_verify_otp_rejects_wrong_and_expired_codes() {
    let app = setup_test_app().await;
    app.client()
        .post(&api_path("/auth/sign_up"))
        .json(&fixtures::sign_up_body("owner@acme.test"))
        .await;
    let otp = stored_otp(&app, "owner@acme.test").await;
    let wrong = if otp == "1234" { "4321" } else { "1234" };

    let response = app
        .client()
        .post(&api_path("/auth/verify_otp"))
        .json(&json!({ "email": "owner@acme.test", "otp": wrong }))
        .await;
    assert_eq!(response.status_code(), 400);
    assert_eq!(response.json::<Value>()["message"], "Invalid or expired OTP");

    let mut user = app
        .users
        .find_by_email("owner@acme.test")
        .await
        .unwrap()
        .unwrap();
    user.otp_expires_at = Some(Utc::now() - Duration::minutes(1));
    app.users.put(user);

    let response = app
        .client()
        .post(&api_path("/auth/verify_otp"))
        .json(&json!({ "email": "owner@acme.test", "otp": otp }))
        .await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_resend_otp_replaces_code() {
    let app = setup_test_app().await;
    app.client()
        .post(&api_path("/auth/sign_up"))
        .json(&fixtures::sign_up_body("owner@acme.test"))
        .await;

    let response = app
        .client()
        .post(&api_path("/auth/resend_otp"))
        .json(&json!({ "email": "owner@acme.test" }))
        .await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(app.mailer.sent_to("owner@acme.test").len(), 2);
    let otp = stored_otp(&app, "owner@acme.test").await;
    assert!(app.mailer.sent_to("owner@acme.test")[1].body.contains(&otp));
}

#[tokio::test]
async fn test_resend_otp_for_verified_account_is_rejected() {
    let app = setup_test_app().await;
    register_business(&app, "owner@acme.test").await;

    let response = app
        .client()
        .post(&api_path("/auth/resend_otp"))
        .json(&json!({ "email": "owner@acme.test" }))
        .await;

    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_sign_in_with_wrong_password() {
    let app = setup_test_app().await;
    create_admin(&app).await;

    let response = app
        .client()
        .post(&api_path("/auth/sign_in"))
        .json(&json!({ "email": "admin@cradle.test", "password": "Wr0ngPass!" }))
        .await;

    assert_eq!(response.status_code(), 401);
    assert_eq!(response.json::<Value>()["message"], "Invalid credentials");
}

#[tokio::test]
async fn test_protected_route_requires_bearer_token() {
    let app = setup_test_app().await;

    let response = app.client().get(&api_path("/auth/me")).await;
    assert_eq!(response.status_code(), 401);

    let response = app
        .client()
        .get(&api_path("/auth/me"))
        .add_header("Authorization", "Bearer not-a-jwt")
        .await;
    assert_eq!(response.status_code(), 401);
    assert_eq!(response.json::<Value>()["success"], false);
}

#[tokio::test]
async fn test_deactivated_account_loses_access() {
    let app = setup_test_app().await;
    let admin = create_admin(&app).await;
    let business = register_business(&app, "owner@acme.test").await;

    let response = app
        .client()
        .put(&api_path(&format!("/users/{}", business.id)))
        .add_header("Authorization", admin.bearer())
        .json(&json!({ "is_active": false }))
        .await;
    assert_eq!(response.status_code(), 200);

    let response = app
        .client()
        .get(&api_path("/auth/me"))
        .add_header("Authorization", business.bearer())
        .await;
    assert_eq!(response.status_code(), 403);
    assert_eq!(response.json::<Value>()["message"], "Account is deactivated");
}

#[tokio::test]
async fn test_admin_bootstrap_is_idempotent() {
    use cradle_api::auth::JwtService;
    use cradle_api::services::{AuthService, FileUploader};
    use cradle_core::models::UserRole;
    use cradle_db::memory::InMemoryUserRepository;
    use std::sync::Arc;

    let app = setup_test_app().await;
    let users = InMemoryUserRepository::new();
    let service = AuthService::new(
        Arc::new(users.clone()),
        FileUploader::new(app.storage.clone(), helpers::MAX_UPLOAD_SIZE_BYTES),
        app.mailer.clone(),
        JwtService::new(helpers::TEST_JWT_SECRET, 30),
        10,
    );

    service
        .ensure_admin("root@cradle.test", fixtures::TEST_PASSWORD)
        .await
        .unwrap();
    service
        .ensure_admin("root@cradle.test", "ignored-on-second-run")
        .await
        .unwrap();

    let admin = users.find_by_email("root@cradle.test").await.unwrap().unwrap();
    assert_eq!(admin.role, UserRole::Admin);
    assert!(admin.is_verified);

    let signed_in = service
        .sign_in("root@cradle.test", fixtures::TEST_PASSWORD)
        .await
        .unwrap();
    assert_eq!(signed_in.user.id, admin.id);
    assert!(app.mailer.sent().is_empty());
}
