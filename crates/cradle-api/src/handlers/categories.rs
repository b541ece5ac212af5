use axum::{extract::State, http::StatusCode, response::IntoResponse};
use uuid::Uuid;

use crate::auth::AuthContext;
use crate::error::{ApiPath, HttpAppError, ValidatedJson};
use crate::response::{ApiResponse, MessageResponse};
use crate::state::Services;
use cradle_core::models::{Category, CreateCategoryRequest, UpdateCategoryRequest};

#[utoipa::path(
    post,
    path = "/api/v1/categories",
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created", body = ApiResponse<Category>),
        (status = 403, description = "Admin only"),
        (status = 409, description = "Name already exists")
    ),
    security(("bearer_auth" = [])),
    tag = "categories"
)]
#[tracing::instrument(skip(services, ctx, request))]
pub async fn create_category(
    State(services): State<Services>,
    ctx: AuthContext,
    ValidatedJson(request): ValidatedJson<CreateCategoryRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let category = services.categories.create(&ctx, request).await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::ok("Category created successfully", category),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/categories",
    responses(
        (status = 200, description = "All categories ordered by name", body = ApiResponse<Vec<Category>>)
    ),
    security(("bearer_auth" = [])),
    tag = "categories"
)]
#[tracing::instrument(skip(services, _ctx))]
pub async fn list_categories(
    State(services): State<Services>,
    _ctx: AuthContext,
) -> Result<impl IntoResponse, HttpAppError> {
    let categories = services.categories.list().await?;
    Ok(ApiResponse::ok("Categories fetched successfully", categories))
}

#[utoipa::path(
    get,
    path = "/api/v1/categories/{id}",
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category", body = ApiResponse<Category>),
        (status = 404, description = "Category not found")
    ),
    security(("bearer_auth" = [])),
    tag = "categories"
)]
#[tracing::instrument(skip(services, _ctx))]
pub async fn get_category(
    State(services): State<Services>,
    _ctx: AuthContext,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let category = services.categories.get(id).await?;
    Ok(ApiResponse::ok("Category fetched successfully", category))
}

#[utoipa::path(
    put,
    path = "/api/v1/categories/{id}",
    params(("id" = Uuid, Path, description = "Category ID")),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = ApiResponse<Category>),
        (status = 404, description = "Category not found"),
        (status = 409, description = "Name already exists")
    ),
    security(("bearer_auth" = [])),
    tag = "categories"
)]
#[tracing::instrument(skip(services, ctx, request))]
pub async fn update_category(
    State(services): State<Services>,
    ctx: AuthContext,
    ApiPath(id): ApiPath<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateCategoryRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let category = services.categories.update(&ctx, id, request).await?;
    Ok(ApiResponse::ok("Category updated successfully", category))
}

#[utoipa::path(
    delete,
    path = "/api/v1/categories/{id}",
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category deleted", body = MessageResponse),
        (status = 404, description = "Category not found")
    ),
    security(("bearer_auth" = [])),
    tag = "categories"
)]
#[tracing::instrument(skip(services, ctx))]
pub async fn delete_category(
    State(services): State<Services>,
    ctx: AuthContext,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    services.categories.delete(&ctx, id).await?;
    Ok(MessageResponse::ok("Category deleted successfully"))
}
