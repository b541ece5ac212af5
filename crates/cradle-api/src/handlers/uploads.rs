use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::AuthContext;
use crate::error::{HttpAppError, ValidatedJson};
use crate::response::ApiResponse;
use crate::state::Services;
use cradle_storage::keys::UPLOADS;

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UploadRequest {
    /// `data:image/<type>;base64,<payload>`
    #[validate(length(min = 1, message = "base64_file is required"))]
    pub base64_file: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    pub url: String,
    pub key: String,
}

/// Upload an image and return its public URL
#[utoipa::path(
    post,
    path = "/api/v1/uploads",
    request_body = UploadRequest,
    responses(
        (status = 201, description = "Image stored", body = ApiResponse<UploadResponse>),
        (status = 400, description = "Not an image data URI, or upload failure"),
        (status = 413, description = "File too large")
    ),
    security(("bearer_auth" = [])),
    tag = "uploads"
)]
#[tracing::instrument(skip(services, ctx, request), fields(user_id = %ctx.user_id))]
pub async fn upload_image(
    State(services): State<Services>,
    ctx: AuthContext,
    ValidatedJson(request): ValidatedJson<UploadRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let file = services.files.decode_image(&request.base64_file)?;
    let stored = services.files.store(UPLOADS, file).await?;

    Ok((
        StatusCode::CREATED,
        ApiResponse::ok(
            "File uploaded successfully",
            UploadResponse {
                url: stored.url,
                key: stored.key,
            },
        ),
    ))
}
