use axum::{extract::State, http::StatusCode, response::IntoResponse};
use uuid::Uuid;

use crate::auth::AuthContext;
use crate::error::{ApiPath, HttpAppError, ValidatedJson};
use crate::response::{ApiResponse, MessageResponse};
use crate::state::Services;
use cradle_core::models::{CreateRequestTypeRequest, RequestType, UpdateRequestTypeRequest};

#[utoipa::path(
    post,
    path = "/api/v1/request_types",
    request_body = CreateRequestTypeRequest,
    responses(
        (status = 201, description = "Request type created", body = ApiResponse<RequestType>),
        (status = 403, description = "Admin only"),
        (status = 409, description = "Name already exists")
    ),
    security(("bearer_auth" = [])),
    tag = "request_types"
)]
#[tracing::instrument(skip(services, ctx, request))]
pub async fn create_request_type(
    State(services): State<Services>,
    ctx: AuthContext,
    ValidatedJson(request): ValidatedJson<CreateRequestTypeRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let request_type = services.request_types.create(&ctx, request).await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::ok("Request type created successfully", request_type),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/request_types",
    responses(
        (status = 200, description = "All request types ordered by name", body = ApiResponse<Vec<RequestType>>)
    ),
    security(("bearer_auth" = [])),
    tag = "request_types"
)]
#[tracing::instrument(skip(services, _ctx))]
pub async fn list_request_types(
    State(services): State<Services>,
    _ctx: AuthContext,
) -> Result<impl IntoResponse, HttpAppError> {
    let request_types = services.request_types.list().await?;
    Ok(ApiResponse::ok("Request types fetched successfully", request_types))
}

#[utoipa::path(
    get,
    path = "/api/v1/request_types/{id}",
    params(("id" = Uuid, Path, description = "Request type ID")),
    responses(
        (status = 200, description = "Request type", body = ApiResponse<RequestType>),
        (status = 404, description = "Request type not found")
    ),
    security(("bearer_auth" = [])),
    tag = "request_types"
)]
#[tracing::instrument(skip(services, _ctx))]
pub async fn get_request_type(
    State(services): State<Services>,
    _ctx: AuthContext,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let request_type = services.request_types.get(id).await?;
    Ok(ApiResponse::ok("Request type fetched successfully", request_type))
}

#[utoipa::path(
    put,
    path = "/api/v1/request_types/{id}",
    params(("id" = Uuid, Path, description = "Request type ID")),
    request_body = UpdateRequestTypeRequest,
    responses(
        (status = 200, description = "Request type updated", body = ApiResponse<RequestType>),
        (status = 404, description = "Request type not found"),
        (status = 409, description = "Name already exists")
    ),
    security(("bearer_auth" = [])),
    tag = "request_types"
)]
#[tracing::instrument(skip(services, ctx, request))]
pub async fn update_request_type(
    State(services): State<Services>,
    ctx: AuthContext,
    ApiPath(id): ApiPath<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateRequestTypeRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let request_type = services.request_types.update(&ctx, id, request).await?;
    Ok(ApiResponse::ok("Request type updated successfully", request_type))
}

#[utoipa::path(
    delete,
    path = "/api/v1/request_types/{id}",
    params(("id" = Uuid, Path, description = "Request type ID")),
    responses(
        (status = 200, description = "Request type deleted", body = MessageResponse),
        (status = 404, description = "Request type not found")
    ),
    security(("bearer_auth" = [])),
    tag = "request_types"
)]
#[tracing::instrument(skip(services, ctx))]
pub async fn delete_request_type(
    State(services): State<Services>,
    ctx: AuthContext,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    services.request_types.delete(&ctx, id).await?;
    Ok(MessageResponse::ok("Request type deleted successfully"))
}
