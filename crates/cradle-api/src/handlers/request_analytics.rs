//! Data request handlers
//!
//! Create, edit, advance and list request analytics records. Ownership and
//! scope rules live in `RequestAnalyticsService`; these handlers only adapt
//! HTTP input and wrap results in the response envelope.

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use uuid::Uuid;

use crate::auth::AuthContext;
use crate::error::{ApiPath, HttpAppError, ValidatedJson, ValidatedQuery};
use crate::handlers::PaginationQuery;
use crate::response::{ApiResponse, CountResponse, MessageResponse};
use crate::state::Services;
use cradle_core::models::{
    CreateRequestAnalyticsRequest, ListScope, RequestAnalytics, UpdateRequestAnalyticsRequest,
};

/// Submit a data request with its attached file
#[utoipa::path(
    post,
    path = "/api/v1/request_analytics",
    request_body = CreateRequestAnalyticsRequest,
    responses(
        (status = 201, description = "Request created with status pending", body = ApiResponse<RequestAnalytics>),
        (status = 400, description = "Invalid body, malformed data URI or upload failure"),
        (status = 404, description = "Category, request type or owner not found"),
        (status = 413, description = "File too large")
    ),
    security(("bearer_auth" = [])),
    tag = "request_analytics"
)]
#[tracing::instrument(skip(services, ctx, request))]
pub async fn create_request(
    State(services): State<Services>,
    ctx: AuthContext,
    ValidatedJson(request): ValidatedJson<CreateRequestAnalyticsRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let record = services.request_analytics.create(&ctx, request).await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::ok("Request analytics created successfully", record),
    ))
}

/// Edit a request; omitted fields and files keep their stored value
#[utoipa::path(
    put,
    path = "/api/v1/request_analytics/{id}",
    params(("id" = Uuid, Path, description = "Request analytics ID")),
    request_body = UpdateRequestAnalyticsRequest,
    responses(
        (status = 200, description = "Request updated", body = ApiResponse<RequestAnalytics>),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Request not found"),
        (status = 409, description = "Request already completed")
    ),
    security(("bearer_auth" = [])),
    tag = "request_analytics"
)]
#[tracing::instrument(skip(services, ctx, request))]
pub async fn update_request(
    State(services): State<Services>,
    ctx: AuthContext,
    ApiPath(id): ApiPath<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateRequestAnalyticsRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let record = services.request_analytics.update(&ctx, id, request).await?;
    Ok(ApiResponse::ok("Request analytics updated successfully", record))
}

/// Advance the status one step (admin). `success` is false when the request
/// was already completed.
#[utoipa::path(
    put,
    path = "/api/v1/request_analytics/{id}/status",
    params(("id" = Uuid, Path, description = "Request analytics ID")),
    responses(
        (status = 200, description = "Status advanced, or already completed", body = ApiResponse<RequestAnalytics>),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Request not found"),
        (status = 409, description = "Stored status invalid or changed concurrently")
    ),
    security(("bearer_auth" = [])),
    tag = "request_analytics"
)]
#[tracing::instrument(skip(services, ctx))]
pub async fn advance_status(
    State(services): State<Services>,
    ctx: AuthContext,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let outcome = services.request_analytics.advance(&ctx, id).await?;
    Ok(ApiResponse::with_outcome(
        outcome.advanced,
        outcome.message,
        outcome.record,
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/request_analytics/{id}",
    params(("id" = Uuid, Path, description = "Request analytics ID")),
    responses(
        (status = 200, description = "Request", body = ApiResponse<RequestAnalytics>),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Request not found")
    ),
    security(("bearer_auth" = [])),
    tag = "request_analytics"
)]
#[tracing::instrument(skip(services, ctx))]
pub async fn get_request(
    State(services): State<Services>,
    ctx: AuthContext,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let record = services.request_analytics.get(&ctx, id).await?;
    Ok(ApiResponse::ok("Request analytics fetched successfully", record))
}

#[utoipa::path(
    delete,
    path = "/api/v1/request_analytics/{id}",
    params(("id" = Uuid, Path, description = "Request analytics ID")),
    responses(
        (status = 200, description = "Request deleted", body = MessageResponse),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Request not found")
    ),
    security(("bearer_auth" = [])),
    tag = "request_analytics"
)]
#[tracing::instrument(skip(services, ctx))]
pub async fn delete_request(
    State(services): State<Services>,
    ctx: AuthContext,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    services.request_analytics.delete(&ctx, id).await?;
    Ok(MessageResponse::ok("Request analytics deleted successfully"))
}

async fn list_scoped(
    services: &Services,
    ctx: &AuthContext,
    scope: ListScope,
    query: &PaginationQuery,
) -> Result<ApiResponse<Vec<RequestAnalytics>>, HttpAppError> {
    let page = services
        .request_analytics
        .list(ctx, scope, query.page_request()?)
        .await?;
    Ok(ApiResponse::paginated(
        "Request analytics fetched successfully",
        page,
    ))
}

/// Every request (admin)
#[utoipa::path(
    get,
    path = "/api/v1/request_analytics",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Page of requests", body = ApiResponse<Vec<RequestAnalytics>>),
        (status = 400, description = "Invalid pagination"),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "request_analytics"
)]
#[tracing::instrument(skip(services, ctx))]
pub async fn list_requests(
    State(services): State<Services>,
    ctx: AuthContext,
    ValidatedQuery(query): ValidatedQuery<PaginationQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    list_scoped(&services, &ctx, ListScope::All, &query).await
}

#[utoipa::path(
    get,
    path = "/api/v1/request_analytics/by_business/{business_id}",
    params(
        ("business_id" = Uuid, Path, description = "Business user ID"),
        PaginationQuery
    ),
    responses(
        (status = 200, description = "Page of the business's requests", body = ApiResponse<Vec<RequestAnalytics>>),
        (status = 403, description = "Caller is neither admin nor that business")
    ),
    security(("bearer_auth" = [])),
    tag = "request_analytics"
)]
#[tracing::instrument(skip(services, ctx))]
pub async fn list_requests_by_business(
    State(services): State<Services>,
    ctx: AuthContext,
    ApiPath(business_id): ApiPath<Uuid>,
    ValidatedQuery(query): ValidatedQuery<PaginationQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    list_scoped(&services, &ctx, ListScope::ByBusiness(business_id), &query).await
}

#[utoipa::path(
    get,
    path = "/api/v1/request_analytics/by_user/{user_id}",
    params(
        ("user_id" = Uuid, Path, description = "Owner user ID"),
        PaginationQuery
    ),
    responses(
        (status = 200, description = "Page of the user's requests", body = ApiResponse<Vec<RequestAnalytics>>),
        (status = 403, description = "Caller may not see this user's requests")
    ),
    security(("bearer_auth" = [])),
    tag = "request_analytics"
)]
#[tracing::instrument(skip(services, ctx))]
pub async fn list_requests_by_user(
    State(services): State<Services>,
    ctx: AuthContext,
    ApiPath(user_id): ApiPath<Uuid>,
    ValidatedQuery(query): ValidatedQuery<PaginationQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    list_scoped(&services, &ctx, ListScope::ByUser(user_id), &query).await
}

/// Total number of requests (admin)
#[utoipa::path(
    get,
    path = "/api/v1/request_analytics/count",
    responses(
        (status = 200, description = "Request count", body = ApiResponse<CountResponse>),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "request_analytics"
)]
#[tracing::instrument(skip(services, ctx))]
pub async fn count_requests(
    State(services): State<Services>,
    ctx: AuthContext,
) -> Result<impl IntoResponse, HttpAppError> {
    let count = services.request_analytics.count_all(&ctx).await?;
    Ok(ApiResponse::ok(
        "Request count fetched successfully",
        CountResponse { count },
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/request_analytics/count/by_user/{user_id}",
    params(("user_id" = Uuid, Path, description = "Owner user ID")),
    responses(
        (status = 200, description = "Request count for the user", body = ApiResponse<CountResponse>),
        (status = 403, description = "Caller may not see this user's requests")
    ),
    security(("bearer_auth" = [])),
    tag = "request_analytics"
)]
#[tracing::instrument(skip(services, ctx))]
pub async fn count_requests_by_user(
    State(services): State<Services>,
    ctx: AuthContext,
    ApiPath(user_id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let count = services.request_analytics.count_by_user(&ctx, user_id).await?;
    Ok(ApiResponse::ok(
        "Request count fetched successfully",
        CountResponse { count },
    ))
}
