//! Request analytics integration tests: submission with file upload, tenant
//! scoping, owner edits and the admin status lifecycle.
//!
//! Run with: `cargo test -p cradle-api --test request_analytics_test`

mod helpers;

use cradle_storage::keys::REQUEST_FILES;
use helpers::auth::{create_admin, create_sub_user, register_business, seed_catalog, TestUser};
use helpers::{api_path, fixtures, setup_test_app, TestApp, MAX_UPLOAD_SIZE_BYTES};
use serde_json::{json, Value};
use uuid::Uuid;

async fn submit(app: &TestApp, user: &TestUser, body: &Value) -> Value {
    let response = app
        .client()
        .post(&api_path("/request_analytics"))
        .add_header("Authorization", user.bearer())
        .json(body)
        .await;
    assert_eq!(response.status_code(), 201, "create failed: {}", response.text());
    response.json::<Value>()["data"].clone()
}

async fn advance(app: &TestApp, user: &TestUser, id: &str) -> axum_test::TestResponse {
    app.client()
        .put(&api_path(&format!("/request_analytics/{}/status", id)))
        .add_header("Authorization", user.bearer())
        .await
}

struct World {
    app: TestApp,
    admin: TestUser,
    business: TestUser,
    member: TestUser,
    category_id: Uuid,
    request_type_id: Uuid,
}

async fn world() -> World {
    let app = setup_test_app().await;
    let admin = create_admin(&app).await;
    let business = register_business(&app, "owner@acme.test").await;
    let member = create_sub_user(&app, &business, "analyst@acme.test").await;
    let (category_id, request_type_id) = seed_catalog(&app, &admin).await;
    World {
        app,
        admin,
        business,
        member,
        category_id,
        request_type_id,
    }
}

#[tokio::test]
async fn test_create_request_stores_file_and_starts_pending() {
    let w = world().await;
    let record = submit(
        &w.app,
        &w.business,
        &fixtures::request_body(w.category_id, w.request_type_id),
    )
    .await;

    assert_eq!(record["status"], "pending");
    assert_eq!(record["data_consent"], 1);
    assert_eq!(record["user_id"], w.business.id.to_string());
    assert_eq!(record["business_id"], w.business.id.to_string());
    assert!(record["output_file"].is_null());

    let url = record["data_file"].as_str().unwrap();
    assert!(url.starts_with(helpers::TEST_BASE_URL));
    assert!(url.ends_with(".csv"));
    assert!(w.app.storage.holds_url(url).await);
}

#[tokio::test]
async fn test_sub_user_request_belongs_to_its_business() {
    let w = world().await;
    let record = submit(
        &w.app,
        &w.member,
        &fixtures::request_body(w.category_id, w.request_type_id),
    )
    .await;

    assert_eq!(record["user_id"], w.member.id.to_string());
    assert_eq!(record["business_id"], w.business.id.to_string());
}

#[tokio::test]
async fn test_consent_accepts_boolean() {
    let w = world().await;
    let mut body = fixtures::request_body(w.category_id, w.request_type_id);
    body["data_consent"] = json!(false);

    let record = submit(&w.app, &w.business, &body).await;
    assert_eq!(record["data_consent"], 0);
}

#[tokio::test]
async fn test_invalid_file_is_rejected_without_upload() {
    let w = world().await;
    let uploads = w.app.storage.uploads();
    let mut body = fixtures::request_body(w.category_id, w.request_type_id);
    body["data_file"] = json!("not-a-data-uri");

    let response = w
        .app
        .client()
        .post(&api_path("/request_analytics"))
        .add_header("Authorization", w.business.bearer())
        .json(&body)
        .await;

    assert_eq!(response.status_code(), 400);
    assert_eq!(w.app.storage.uploads(), uploads);
    assert!(w.app.records.is_empty());
}

#[tokio::test]
async fn test_oversized_file_is_rejected_without_upload() {
    let w = world().await;
    let uploads = w.app.storage.uploads();
    let mut body = fixtures::request_body(w.category_id, w.request_type_id);
    body["data_file"] = json!(fixtures::csv_of_size(MAX_UPLOAD_SIZE_BYTES + 1));

    let response = w
        .app
        .client()
        .post(&api_path("/request_analytics"))
        .add_header("Authorization", w.business.bearer())
        .json(&body)
        .await;

    assert_eq!(response.status_code(), 413);
    assert_eq!(w.app.storage.uploads(), uploads);
}

#[tokio::test]
async fn test_unknown_category_is_not_found_without_upload() {
    let w = world().await;
    let uploads = w.app.storage.uploads();

    let response = w
        .app
        .client()
        .post(&api_path("/request_analytics"))
        .add_header("Authorization", w.business.bearer())
        .json(&fixtures::request_body(Uuid::new_v4(), w.request_type_id))
        .await;

    assert_eq!(response.status_code(), 404);
    assert_eq!(response.json::<Value>()["message"], "Category not found");
    assert_eq!(w.app.storage.uploads(), uploads);
}

#[tokio::test]
async fn test_failed_upload_creates_no_record() {
    let w = world().await;
    w.app.storage.fail_uploads(true);

    let response = w
        .app
        .client()
        .post(&api_path("/request_analytics"))
        .add_header("Authorization", w.business.bearer())
        .json(&fixtures::request_body(w.category_id, w.request_type_id))
        .await;

    assert_eq!(response.status_code(), 400);
    assert_eq!(response.json::<Value>()["message"], "Failed to upload file");
    assert!(w.app.records.is_empty());
}

#[tokio::test]
async fn test_failed_insert_removes_uploaded_file() {
    let w = world().await;
    w.app.records.fail_next_insert();

    let response = w
        .app
        .client()
        .post(&api_path("/request_analytics"))
        .add_header("Authorization", w.business.bearer())
        .json(&fixtures::request_body(w.category_id, w.request_type_id))
        .await;

    assert_eq!(response.status_code(), 500);
    assert!(w.app.records.is_empty());
    assert_eq!(w.app.storage.files_in(REQUEST_FILES), 0);
}

#[tokio::test]
async fn test_only_admin_submits_for_another_user() {
    let w = world().await;
    let mut body = fixtures::request_body(w.category_id, w.request_type_id);
    body["user_id"] = json!(w.member.id);

    let response = w
        .app
        .client()
        .post(&api_path("/request_analytics"))
        .add_header("Authorization", w.business.bearer())
        .json(&body)
        .await;
    assert_eq!(response.status_code(), 403);

    let record = submit(&w.app, &w.admin, &body).await;
    assert_eq!(record["user_id"], w.member.id.to_string());
    assert_eq!(record["business_id"], w.business.id.to_string());
}

#[tokio::test]
async fn test_status_advances_one_step_at_a_time() {
    let w = world().await;
    let record = submit(
        &w.app,
        &w.business,
        &fixtures::request_body(w.category_id, w.request_type_id),
    )
    .await;
    let id = record["id"].as_str().unwrap();

    let body = advance(&w.app, &w.admin, id).await.json::<Value>();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "in progress");
    assert_eq!(
        body["message"],
        "Request status updated from pending to in progress"
    );

    let body = advance(&w.app, &w.admin, id).await.json::<Value>();
    assert_eq!(body["data"]["status"], "completed");

    let response = advance(&w.app, &w.admin, id).await;
    assert_eq!(response.status_code(), 200);
    let body = response.json::<Value>();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Request is already completed");
    assert_eq!(body["data"]["status"], "completed");
}

#[tokio::test]
async fn test_status_advance_is_admin_only() {
    let w = world().await;
    let record = submit(
        &w.app,
        &w.business,
        &fixtures::request_body(w.category_id, w.request_type_id),
    )
    .await;

    let response = advance(&w.app, &w.business, record["id"].as_str().unwrap()).await;
    assert_eq!(response.status_code(), 403);

    let response = advance(&w.app, &w.admin, &Uuid::new_v4().to_string()).await;
    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_corrupted_status_is_invalid_state() {
    let w = world().await;
    let record = submit(
        &w.app,
        &w.business,
        &fixtures::request_body(w.category_id, w.request_type_id),
    )
    .await;
    let id = record["id"].as_str().unwrap();
    w.app.records.force_status(id.parse().unwrap(), "archived");

    let response = advance(&w.app, &w.admin, id).await;
    assert_eq!(response.status_code(), 409);
    assert_eq!(response.json::<Value>()["success"], false);
}

#[tokio::test]
async fn test_update_replaces_file_and_removes_old_one() {
    let w = world().await;
    let record = submit(
        &w.app,
        &w.member,
        &fixtures::request_body(w.category_id, w.request_type_id),
    )
    .await;
    let id = record["id"].as_str().unwrap();
    let old_url = record["data_file"].as_str().unwrap().to_string();

    let response = w
        .app
        .client()
        .put(&api_path(&format!("/request_analytics/{}", id)))
        .add_header("Authorization", w.member.bearer())
        .json(&json!({ "data_title": "Q4 sales", "data_file": fixtures::PNG_DATA_URI }))
        .await;

    assert_eq!(response.status_code(), 200);
    let updated = response.json::<Value>()["data"].clone();
    assert_eq!(updated["data_title"], "Q4 sales");
    assert_eq!(updated["data_description"], record["data_description"]);
    let new_url = updated["data_file"].as_str().unwrap();
    assert_ne!(new_url, old_url);
    assert!(w.app.storage.holds_url(new_url).await);
    assert!(!w.app.storage.holds_url(&old_url).await);
}

#[tokio::test]
async fn test_update_without_file_keeps_file() {
    let w = world().await;
    let record = submit(
        &w.app,
        &w.business,
        &fixtures::request_body(w.category_id, w.request_type_id),
    )
    .await;
    let uploads = w.app.storage.uploads();

    let response = w
        .app
        .client()
        .put(&api_path(&format!("/request_analytics/{}", record["id"].as_str().unwrap())))
        .add_header("Authorization", w.business.bearer())
        .json(&json!({ "data_consent": 0 }))
        .await;

    assert_eq!(response.status_code(), 200);
    let updated = response.json::<Value>()["data"].clone();
    assert_eq!(updated["data_consent"], 0);
    assert_eq!(updated["data_file"], record["data_file"]);
    assert_eq!(w.app.storage.uploads(), uploads);
}

#[tokio::test]
async fn test_output_file_is_admin_only() {
    let w = world().await;
    let record = submit(
        &w.app,
        &w.business,
        &fixtures::request_body(w.category_id, w.request_type_id),
    )
    .await;
    let path = api_path(&format!("/request_analytics/{}", record["id"].as_str().unwrap()));
    let body = json!({ "output_file": fixtures::CSV_DATA_URI });

    let response = w
        .app
        .client()
        .put(&path)
        .add_header("Authorization", w.business.bearer())
        .json(&body)
        .await;
    assert_eq!(response.status_code(), 403);

    let response = w
        .app
        .client()
        .put(&path)
        .add_header("Authorization", w.admin.bearer())
        .json(&body)
        .await;
    assert_eq!(response.status_code(), 200);
    let output = response.json::<Value>()["data"]["output_file"].clone();
    assert!(w.app.storage.holds_url(output.as_str().unwrap()).await);
}

#[tokio::test]
async fn test_completed_request_is_read_only_for_owner() {
    let w = world().await;
    let record = submit(
        &w.app,
        &w.business,
        &fixtures::request_body(w.category_id, w.request_type_id),
    )
    .await;
    let id = record["id"].as_str().unwrap();
    advance(&w.app, &w.admin, id).await;
    advance(&w.app, &w.admin, id).await;

    let response = w
        .app
        .client()
        .put(&api_path(&format!("/request_analytics/{}", id)))
        .add_header("Authorization", w.business.bearer())
        .json(&json!({ "data_title": "Late edit" }))
        .await;

    assert_eq!(response.status_code(), 409);
}

#[tokio::test]
async fn test_other_tenants_cannot_read_or_delete() {
    let w = world().await;
    let other = register_business(&w.app, "owner@globex.test").await;
    let record = submit(
        &w.app,
        &w.member,
        &fixtures::request_body(w.category_id, w.request_type_id),
    )
    .await;
    let path = api_path(&format!("/request_analytics/{}", record["id"].as_str().unwrap()));

    for user in [&other, &w.admin, &w.business, &w.member] {
        let response = w
            .app
            .client()
            .get(&path)
            .add_header("Authorization", user.bearer())
            .await;
        let expected = if user.id == other.id { 403 } else { 200 };
        assert_eq!(response.status_code(), expected, "reader {}", user.email);
    }

    let response = w
        .app
        .client()
        .delete(&path)
        .add_header("Authorization", other.bearer())
        .await;
    assert_eq!(response.status_code(), 403);
    assert_eq!(w.app.records.len(), 1);
}

#[tokio::test]
async fn test_delete_removes_record_and_files() {
    let w = world().await;
    let record = submit(
        &w.app,
        &w.business,
        &fixtures::request_body(w.category_id, w.request_type_id),
    )
    .await;
    let path = api_path(&format!("/request_analytics/{}", record["id"].as_str().unwrap()));

    let response = w
        .app
        .client()
        .delete(&path)
        .add_header("Authorization", w.business.bearer())
        .await;

    assert_eq!(response.status_code(), 200);
    assert!(w.app.records.is_empty());
    assert!(!w.app.storage.holds_url(record["data_file"].as_str().unwrap()).await);

    let response = w
        .app
        .client()
        .get(&path)
        .add_header("Authorization", w.business.bearer())
        .await;
    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_listings_are_scoped_and_paginated() {
    let w = world().await;
    let other = register_business(&w.app, "owner@globex.test").await;
    let body = fixtures::request_body(w.category_id, w.request_type_id);
    for _ in 0..3 {
        submit(&w.app, &w.member, &body).await;
    }
    submit(&w.app, &w.business, &body).await;
    submit(&w.app, &other, &body).await;

    let response = w
        .app
        .client()
        .get(&api_path("/request_analytics"))
        .add_query_param("page", 2)
        .add_query_param("page_size", 2)
        .add_header("Authorization", w.admin.bearer())
        .await;
    assert_eq!(response.status_code(), 200);
    let page = response.json::<Value>();
    assert_eq!(page["data"].as_array().unwrap().len(), 2);
    assert_eq!(page["pagination"]["total"], 5);
    assert_eq!(page["pagination"]["page"], 2);
    assert_eq!(page["pagination"]["page_count"], 3);

    let response = w
        .app
        .client()
        .get(&api_path("/request_analytics"))
        .add_header("Authorization", w.business.bearer())
        .await;
    assert_eq!(response.status_code(), 403);

    let response = w
        .app
        .client()
        .get(&api_path(&format!("/request_analytics/by_business/{}", w.business.id)))
        .add_header("Authorization", w.business.bearer())
        .await;
    assert_eq!(response.json::<Value>()["pagination"]["total"], 4);

    let response = w
        .app
        .client()
        .get(&api_path(&format!("/request_analytics/by_business/{}", w.business.id)))
        .add_header("Authorization", other.bearer())
        .await;
    assert_eq!(response.status_code(), 403);

    let response = w
        .app
        .client()
        .get(&api_path(&format!("/request_analytics/by_user/{}", w.member.id)))
        .add_header("Authorization", w.business.bearer())
        .await;
    assert_eq!(response.json::<Value>()["pagination"]["total"], 3);

    let response = w
        .app
        .client()
        .get(&api_path(&format!("/request_analytics/by_user/{}", w.member.id)))
        .add_header("Authorization", other.bearer())
        .await;
    assert_eq!(response.status_code(), 403);
}

#[tokio::test]
async fn test_counts() {
    let w = world().await;
    let body = fixtures::request_body(w.category_id, w.request_type_id);
    submit(&w.app, &w.member, &body).await;
    submit(&w.app, &w.member, &body).await;
    submit(&w.app, &w.business, &body).await;

    let response = w
        .app
        .client()
        .get(&api_path("/request_analytics/count"))
        .add_header("Authorization", w.admin.bearer())
        .await;
    assert_eq!(response.json::<Value>()["data"]["count"], 3);

    let response = w
        .app
        .client()
        .get(&api_path(&format!("/request_analytics/count/by_user/{}", w.member.id)))
        .add_header("Authorization", w.member.bearer())
        .await;
    assert_eq!(response.json::<Value>()["data"]["count"], 2);

    let response = w
        .app
        .client()
        .get(&api_path("/request_analytics/count"))
        .add_header("Authorization", w.member.bearer())
        .await;
    assert_eq!(response.status_code(), 403);
}

#[tokio::test]
async fn test_business_listing_pages_past_the_end() {
    let w = world().await;
    let body = fixtures::request_body(w.category_id, w.request_type_id);
    let mut ids = Vec::new();
    for _ in 0..15 {
        let record = submit(&w.app, &w.business, &body).await;
        ids.push(record["id"].as_str().unwrap().to_string());
    }

    let list = |page: u32| {
        w.app
            .client()
            .get(&api_path(&format!("/request_analytics/by_business/{}", w.business.id)))
            .add_query_param("page", page)
            .add_query_param("page_size", 10)
            .add_header("Authorization", w.business.bearer())
    };

    let response = list(2).await;
    assert_eq!(response.status_code(), 200);
    let body = response.json::<Value>();
    let items: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap())
        .collect();
    assert_eq!(items, ids[10..].iter().map(String::as_str).collect::<Vec<_>>());
    assert_eq!(body["pagination"]["total"], 15);
    assert_eq!(body["pagination"]["page_count"], 2);

    let response = list(3).await;
    assert_eq!(response.status_code(), 200);
    let body = response.json::<Value>();
    assert_eq!(body["data"], json!([]));
    assert_eq!(body["pagination"]["total"], 15);
    assert_eq!(body["pagination"]["page"], 3);
    assert_eq!(body["pagination"]["page_count"], 2);
}

#[tokio::test]
async fn test_oversized_page_request_is_bounded() {
    let w = world().await;
    submit(
        &w.app,
        &w.business,
        &fixtures::request_body(w.category_id, w.request_type_id),
    )
    .await;

    let response = w
        .app
        .client()
        .get(&api_path("/request_analytics"))
        .add_query_param("page", u32::MAX)
        .add_query_param("page_size", u32::MAX)
        .add_header("Authorization", w.admin.bearer())
        .await;

    assert_eq!(response.status_code(), 200);
    let body = response.json::<Value>();
    assert_eq!(body["data"], json!([]));
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["pagination"]["page_size"], 100);
    assert_eq!(body["pagination"]["page_count"], 1);

    let response = w
        .app
        .client()
        .get(&api_path("/request_analytics"))
        .add_query_param("page", 0)
        .add_header("Authorization", w.admin.bearer())
        .await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_failed_replacement_upload_keeps_original_file() {
    let w = world().await;
    let record = submit(
        &w.app,
        &w.member,
        &fixtures::request_body(w.category_id, w.request_type_id),
    )
    .await;
    let id = record["id"].as_str().unwrap();
    let original = record["data_file"].as_str().unwrap().to_string();

    w.app.storage.fail_uploads(true);
    let response = w
        .app
        .client()
        .put(&api_path(&format!("/request_analytics/{}", id)))
        .add_header("Authorization", w.member.bearer())
        .json(&json!({ "data_title": "Q4 sales", "data_file": fixtures::PNG_DATA_URI }))
        .await;
    assert_eq!(response.status_code(), 400);
    assert_eq!(response.json::<Value>()["message"], "Failed to upload file");
    w.app.storage.fail_uploads(false);

    let response = w
        .app
        .client()
        .get(&api_path(&format!("/request_analytics/{}", id)))
        .add_header("Authorization", w.member.bearer())
        .await;
    assert_eq!(response.status_code(), 200);
    let stored = response.json::<Value>()["data"].clone();
    assert_eq!(stored["data_file"], original.as_str());
    assert_eq!(stored["data_title"], record["data_title"]);
    assert!(w.app.storage.holds_url(&original).await);
}
