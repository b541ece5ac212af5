use super::{api_path, fixtures, TestApp};
use cradle_api::auth::password::hash_password;
use cradle_core::models::{NewUser, UserRole};
use cradle_db::UserRepository;
use serde_json::{json, Value};
use uuid::Uuid;

/// Signed-in test account.
pub struct TestUser {
    pub id: Uuid,
    pub email: String,
    pub token: String,
}

impl TestUser {
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

pub async fn sign_in(app: &TestApp, email: &str, password: &str) -> Value {
    let response = app
        .client()
        .post(&api_path("/auth/sign_in"))
        .json(&json!({ "email": email, "password": password }))
        .await;
    assert_eq!(response.status_code(), 200, "sign in failed: {}", response.text());
    response.json::<Value>()
}

async fn signed_in(app: &TestApp, email: &str) -> TestUser {
    let body = sign_in(app, email, fixtures::TEST_PASSWORD).await;
    TestUser {
        id: body["data"]["user"]["id"]
            .as_str()
            .and_then(|id| id.parse().ok())
            .expect("user id in sign-in response"),
        email: email.to_string(),
        token: body["data"]["access_token"]
            .as_str()
            .expect("access token in sign-in response")
            .to_string(),
    }
}

/// Insert an admin directly and sign in through the API.
pub async fn create_admin(app: &TestApp) -> TestUser {
    let email = "admin@cradle.test";
    app.users
        .insert(NewUser::with_credentials(
            email.to_string(),
            hash_password(fixtures::TEST_PASSWORD).unwrap(),
            UserRole::Admin,
        ))
        .await
        .unwrap();
    signed_in(app, email).await
}

/// Register a business through sign-up and OTP verification, then sign in.
pub async fn register_business(app: &TestApp, email: &str) -> TestUser {
    let response = app
        .client()
        .post(&api_path("/auth/sign_up"))
        .json(&fixtures::sign_up_body(email))
        .await;
    assert_eq!(response.status_code(), 201, "sign up failed: {}", response.text());

    let otp = stored_otp(app, email).await;
    let response = app
        .client()
        .post(&api_path("/auth/verify_otp"))
        .json(&json!({ "email": email, "otp": otp }))
        .await;
    assert_eq!(response.status_code(), 200, "verify failed: {}", response.text());

    signed_in(app, email).await
}

/// Create a sub-user as `business` and sign in as it.
pub async fn create_sub_user(app: &TestApp, business: &TestUser, email: &str) -> TestUser {
    let response = app
        .client()
        .post(&api_path("/users"))
        .add_header("Authorization", business.bearer())
        .json(&fixtures::sub_user_body(email))
        .await;
    assert_eq!(response.status_code(), 201, "create user failed: {}", response.text());
    signed_in(app, email).await
}

pub async fn stored_otp(app: &TestApp, email: &str) -> String {
    app.users
        .find_by_email(email)
        .await
        .unwrap()
        .and_then(|u| u.otp)
        .expect("OTP stored for user")
}

/// Create a category and a request type as `admin`; returns their ids.
pub async fn seed_catalog(app: &TestApp, admin: &TestUser) -> (Uuid, Uuid) {
    let category = app
        .client()
        .post(&api_path("/categories"))
        .add_header("Authorization", admin.bearer())
        .json(&json!({ "name": "Sales", "description": "Sales data" }))
        .await
        .json::<Value>();
    let request_type = app
        .client()
        .post(&api_path("/request_types"))
        .add_header("Authorization", admin.bearer())
        .json(&json!({ "name": "Export", "description": "Raw export" }))
        .await
        .json::<Value>();

    let id = |v: &Value| -> Uuid {
        v["data"]["id"]
            .as_str()
            .and_then(|s| s.parse().ok())
            .expect("id in create response")
    };
    (id(&category), id(&request_type))
}
