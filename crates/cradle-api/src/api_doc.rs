//! OpenAPI documentation, served at `/api/openapi.json` and rendered by RapiDoc at `/docs`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::error;
use crate::handlers;
use crate::response;
use cradle_core::models;

/// Registers the `bearer_auth` scheme referenced by protected operations.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Cradle API",
        version = "0.1.0",
        description = "Data-request marketplace: businesses and their users submit data requests with attached files, administrators process them through pending, in progress and completed. All endpoints are versioned under /api/v1/."
    ),
    modifiers(&BearerAuth),
    paths(
        // Auth
        handlers::auth::sign_up,
        handlers::auth::verify_otp,
        handlers::auth::resend_otp,
        handlers::auth::sign_in,
        handlers::auth::me,
        // Users
        handlers::users::create_user,
        handlers::users::update_user,
        handlers::users::delete_user,
        handlers::users::get_user,
        handlers::users::list_users,
        handlers::users::list_users_by_business,
        handlers::users::count_businesses,
        // Categories
        handlers::categories::create_category,
        handlers::categories::list_categories,
        handlers::categories::get_category,
        handlers::categories::update_category,
        handlers::categories::delete_category,
        // Request types
        handlers::request_types::create_request_type,
        handlers::request_types::list_request_types,
        handlers::request_types::get_request_type,
        handlers::request_types::update_request_type,
        handlers::request_types::delete_request_type,
        // Request analytics
        handlers::request_analytics::create_request,
        handlers::request_analytics::update_request,
        handlers::request_analytics::advance_status,
        handlers::request_analytics::get_request,
        handlers::request_analytics::delete_request,
        handlers::request_analytics::list_requests,
        handlers::request_analytics::list_requests_by_business,
        handlers::request_analytics::list_requests_by_user,
        handlers::request_analytics::count_requests,
        handlers::request_analytics::count_requests_by_user,
        // Uploads
        handlers::uploads::upload_image,
    ),
    components(
        schemas(
            models::UserRole,
            models::UserResponse,
            models::SignUpRequest,
            models::CreateUserRequest,
            models::UpdateUserRequest,
            models::VerifyOtpRequest,
            models::ResendOtpRequest,
            models::SignInRequest,
            models::SignInResponse,
            models::Category,
            models::CreateCategoryRequest,
            models::UpdateCategoryRequest,
            models::RequestType,
            models::CreateRequestTypeRequest,
            models::UpdateRequestTypeRequest,
            models::RequestStatus,
            models::RequestAnalytics,
            models::CreateRequestAnalyticsRequest,
            models::UpdateRequestAnalyticsRequest,
            handlers::uploads::UploadRequest,
            handlers::uploads::UploadResponse,
            cradle_core::PaginationMeta,
            response::MessageResponse,
            response::CountResponse,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "auth", description = "Business registration, email verification and sign-in"),
        (name = "users", description = "Sub-user management within a business"),
        (name = "categories", description = "Categories data requests are filed under"),
        (name = "request_types", description = "Kinds of data request"),
        (name = "request_analytics", description = "Data requests, their files and status lifecycle"),
        (name = "uploads", description = "Image uploads to object storage")
    )
)]
pub struct ApiDoc;
