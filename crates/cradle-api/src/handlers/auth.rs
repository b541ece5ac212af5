//! Registration, OTP verification and sign-in

use axum::{extract::State, http::StatusCode, response::IntoResponse};

use crate::auth::AuthContext;
use crate::error::{HttpAppError, ValidatedJson};
use crate::response::{ApiResponse, MessageResponse};
use crate::state::Services;
use cradle_core::models::{
    ResendOtpRequest, SignInRequest, SignInResponse, SignUpRequest, UserResponse,
    VerifyOtpRequest,
};

/// Register a business account
#[utoipa::path(
    post,
    path = "/api/v1/auth/sign_up",
    request_body = SignUpRequest,
    responses(
        (status = 201, description = "Account created, OTP sent", body = ApiResponse<UserResponse>),
        (status = 400, description = "Validation failed or invalid image"),
        (status = 409, description = "Email already registered")
    ),
    tag = "auth"
)]
#[tracing::instrument(skip(services, request))]
pub async fn sign_up(
    State(services): State<Services>,
    ValidatedJson(request): ValidatedJson<SignUpRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let user = services.auth.sign_up(request).await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::ok(
            "Registration successful. Please verify your email with the OTP sent to you",
            user,
        ),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/verify_otp",
    request_body = VerifyOtpRequest,
    responses(
        (status = 200, description = "Email verified", body = ApiResponse<UserResponse>),
        (status = 400, description = "Invalid or expired OTP, or already verified"),
        (status = 401, description = "Unknown email")
    ),
    tag = "auth"
)]
#[tracing::instrument(skip(services, request))]
pub async fn verify_otp(
    State(services): State<Services>,
    ValidatedJson(request): ValidatedJson<VerifyOtpRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let user = services
        .auth
        .verify_otp(&request.email, &request.otp)
        .await?;
    Ok(ApiResponse::ok("Email verified successfully", user))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/resend_otp",
    request_body = ResendOtpRequest,
    responses(
        (status = 200, description = "New OTP sent", body = MessageResponse),
        (status = 400, description = "Already verified"),
        (status = 401, description = "Unknown email")
    ),
    tag = "auth"
)]
#[tracing::instrument(skip(services, request))]
pub async fn resend_otp(
    State(services): State<Services>,
    ValidatedJson(request): ValidatedJson<ResendOtpRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    services.auth.resend_otp(&request.email).await?;
    Ok(MessageResponse::ok("A new OTP has been sent to your email"))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/sign_in",
    request_body = SignInRequest,
    responses(
        (status = 200, description = "Signed in", body = ApiResponse<SignInResponse>),
        (status = 401, description = "Invalid credentials or unverified email"),
        (status = 403, description = "Account deactivated")
    ),
    tag = "auth"
)]
#[tracing::instrument(skip(services, request))]
pub async fn sign_in(
    State(services): State<Services>,
    ValidatedJson(request): ValidatedJson<SignInRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let session = services
        .auth
        .sign_in(&request.email, &request.password)
        .await?;
    Ok(ApiResponse::ok("Signed in successfully", session))
}

/// The signed-in user
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    responses(
        (status = 200, description = "Current user", body = ApiResponse<UserResponse>),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = [])),
    tag = "auth"
)]
#[tracing::instrument(skip(services, ctx))]
pub async fn me(
    State(services): State<Services>,
    ctx: AuthContext,
) -> Result<impl IntoResponse, HttpAppError> {
    let user = services.auth.me(ctx.user_id).await?;
    Ok(ApiResponse::ok("User fetched successfully", user))
}
