//! Sub-user management

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use uuid::Uuid;

use crate::auth::AuthContext;
use crate::error::{ApiPath, HttpAppError, ValidatedJson, ValidatedQuery};
use crate::handlers::PaginationQuery;
use crate::response::{ApiResponse, CountResponse, MessageResponse};
use crate::state::Services;
use cradle_core::models::{CreateUserRequest, UpdateUserRequest, UserResponse};

/// Create a sub-user owned by the caller
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = ApiResponse<UserResponse>),
        (status = 400, description = "Validation failed or invalid image"),
        (status = 403, description = "Caller is not an admin or business"),
        (status = 409, description = "Email already registered")
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
#[tracing::instrument(skip(services, ctx, request))]
pub async fn create_user(
    State(services): State<Services>,
    ctx: AuthContext,
    ValidatedJson(request): ValidatedJson<CreateUserRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let user = services.users.create(&ctx, request).await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::ok("User created successfully", user),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = ApiResponse<UserResponse>),
        (status = 403, description = "User belongs to another tenant"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
#[tracing::instrument(skip(services, ctx, request))]
pub async fn update_user(
    State(services): State<Services>,
    ctx: AuthContext,
    ApiPath(id): ApiPath<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateUserRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let user = services.users.update(&ctx, id, request).await?;
    Ok(ApiResponse::ok("User updated successfully", user))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 403, description = "User belongs to another tenant"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
#[tracing::instrument(skip(services, ctx))]
pub async fn delete_user(
    State(services): State<Services>,
    ctx: AuthContext,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    services.users.delete(&ctx, id).await?;
    Ok(MessageResponse::ok("User deleted successfully"))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User", body = ApiResponse<UserResponse>),
        (status = 403, description = "User belongs to another tenant"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
#[tracing::instrument(skip(services, ctx))]
pub async fn get_user(
    State(services): State<Services>,
    ctx: AuthContext,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let user = services.users.get(&ctx, id).await?;
    Ok(ApiResponse::ok("User fetched successfully", user))
}

/// All users (admin)
#[utoipa::path(
    get,
    path = "/api/v1/users",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Page of users", body = ApiResponse<Vec<UserResponse>>),
        (status = 400, description = "Invalid pagination"),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
#[tracing::instrument(skip(services, ctx))]
pub async fn list_users(
    State(services): State<Services>,
    ctx: AuthContext,
    ValidatedQuery(query): ValidatedQuery<PaginationQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let page = services.users.list(&ctx, query.page_request()?).await?;
    Ok(ApiResponse::paginated("Users fetched successfully", page))
}

/// Sub-users of one business
#[utoipa::path(
    get,
    path = "/api/v1/users/by_business/{business_id}",
    params(
        ("business_id" = Uuid, Path, description = "Business user ID"),
        PaginationQuery
    ),
    responses(
        (status = 200, description = "Page of sub-users", body = ApiResponse<Vec<UserResponse>>),
        (status = 403, description = "Caller is neither admin nor that business")
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
#[tracing::instrument(skip(services, ctx))]
pub async fn list_users_by_business(
    State(services): State<Services>,
    ctx: AuthContext,
    ApiPath(business_id): ApiPath<Uuid>,
    ValidatedQuery(query): ValidatedQuery<PaginationQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let page = services
        .users
        .list_by_business(&ctx, business_id, query.page_request()?)
        .await?;
    Ok(ApiResponse::paginated("Users fetched successfully", page))
}

/// Number of registered businesses (admin)
#[utoipa::path(
    get,
    path = "/api/v1/users/count",
    responses(
        (status = 200, description = "Business count", body = ApiResponse<CountResponse>),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
#[tracing::instrument(skip(services, ctx))]
pub async fn count_businesses(
    State(services): State<Services>,
    ctx: AuthContext,
) -> Result<impl IntoResponse, HttpAppError> {
    let count = services.users.count_businesses(&ctx).await?;
    Ok(ApiResponse::ok(
        "Business count fetched successfully",
        CountResponse { count },
    ))
}
