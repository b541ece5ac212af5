use crate::auth::jwt::JwtService;
use crate::auth::models::AuthContext;
use crate::error::HttpAppError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use cradle_core::AppError;
use cradle_db::UserRepository;
use std::sync::Arc;

#[derive(Clone)]
pub struct AuthState {
    pub jwt: JwtService,
    pub users: Arc<dyn UserRepository>,
}

/// Resolve the bearer token to an active user and attach an `AuthContext`.
///
/// The user row is re-read on every request so deactivated or deleted
/// accounts lose access before their token expires.
pub async fn auth_middleware(
    State(auth_state): State<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = match request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
    {
        Some(h) => h,
        None => {
            tracing::debug!("Missing authorization header");
            return HttpAppError(AppError::Unauthorized(
                "Missing authorization header".to_string(),
            ))
            .into_response();
        }
    };

    let token = match auth_header.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => token.trim(),
        _ => {
            return HttpAppError(AppError::Unauthorized(
                "Invalid authorization header format".to_string(),
            ))
            .into_response();
        }
    };

    let claims = match auth_state.jwt.verify(token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::debug!(error = %e, "JWT validation failed");
            return HttpAppError(e).into_response();
        }
    };

    let user = match auth_state.users.find_by_id(claims.sub).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            tracing::warn!(user_id = %claims.sub, "Token refers to a missing user");
            return HttpAppError(AppError::Unauthorized("User not found".to_string()))
                .into_response();
        }
        Err(e) => return HttpAppError(e).into_response(),
    };

    if !user.is_active {
        return HttpAppError(AppError::Forbidden("Account is deactivated".to_string()))
            .into_response();
    }

    let context = AuthContext::from_user(&user);
    tracing::debug!(user_id = %context.user_id, role = %context.role, "Request authenticated");
    request.extensions_mut().insert(context);

    next.run(request).await
}
