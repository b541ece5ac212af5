//! Domain route groups (auth, users, catalog, request analytics, uploads).

use crate::constants::API_PREFIX;
use crate::handlers;
use crate::state::AppState;
use axum::routing::{get, post, put};
use axum::Router;
use std::sync::Arc;

/// Registration and sign-in; no token required.
pub fn auth_public_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(&format!("{}/auth/sign_up", API_PREFIX), post(handlers::auth::sign_up))
        .route(&format!("{}/auth/verify_otp", API_PREFIX), post(handlers::auth::verify_otp))
        .route(&format!("{}/auth/resend_otp", API_PREFIX), post(handlers::auth::resend_otp))
        .route(&format!("{}/auth/sign_in", API_PREFIX), post(handlers::auth::sign_in))
        .with_state(state)
}

pub fn auth_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(&format!("{}/auth/me", API_PREFIX), get(handlers::auth::me))
        .with_state(state)
}

pub fn user_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/users", API_PREFIX),
            get(handlers::users::list_users).post(handlers::users::create_user),
        )
        .route(
            &format!("{}/users/count", API_PREFIX),
            get(handlers::users::count_businesses),
        )
        .route(
            &format!("{}/users/by_business/{{business_id}}", API_PREFIX),
            get(handlers::users::list_users_by_business),
        )
        .route(
            &format!("{}/users/{{id}}", API_PREFIX),
            get(handlers::users::get_user)
                .put(handlers::users::update_user)
                .delete(handlers::users::delete_user),
        )
        .with_state(state)
}

pub fn category_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/categories", API_PREFIX),
            get(handlers::categories::list_categories).post(handlers::categories::create_category),
        )
        .route(
            &format!("{}/categories/{{id}}", API_PREFIX),
            get(handlers::categories::get_category)
                .put(handlers::categories::update_category)
                .delete(handlers::categories::delete_category),
        )
        .with_state(state)
}

pub fn request_type_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/request_types", API_PREFIX),
            get(handlers::request_types::list_request_types)
                .post(handlers::request_types::create_request_type),
        )
        .route(
            &format!("{}/request_types/{{id}}", API_PREFIX),
            get(handlers::request_types::get_request_type)
                .put(handlers::request_types::update_request_type)
                .delete(handlers::request_types::delete_request_type),
        )
        .with_state(state)
}

pub fn request_analytics_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/request_analytics", API_PREFIX),
            get(handlers::request_analytics::list_requests)
                .post(handlers::request_analytics::create_request),
        )
        .route(
            &format!("{}/request_analytics/count", API_PREFIX),
            get(handlers::request_analytics::count_requests),
        )
        .route(
            &format!("{}/request_analytics/count/by_user/{{user_id}}", API_PREFIX),
            get(handlers::request_analytics::count_requests_by_user),
        )
        .route(
            &format!("{}/request_analytics/by_business/{{business_id}}", API_PREFIX),
            get(handlers::request_analytics::list_requests_by_business),
        )
        .route(
            &format!("{}/request_analytics/by_user/{{user_id}}", API_PREFIX),
            get(handlers::request_analytics::list_requests_by_user),
        )
        .route(
            &format!("{}/request_analytics/{{id}}", API_PREFIX),
            get(handlers::request_analytics::get_request)
                .put(handlers::request_analytics::update_request)
                .delete(handlers::request_analytics::delete_request),
        )
        .route(
            &format!("{}/request_analytics/{{id}}/status", API_PREFIX),
            put(handlers::request_analytics::advance_status),
        )
        .with_state(state)
}

pub fn upload_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(&format!("{}/uploads", API_PREFIX), post(handlers::uploads::upload_image))
        .with_state(state)
}
