//! Success envelope shared by every endpoint: `{ success, message, data?, pagination? }`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use cradle_core::{Page, PaginationMeta};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationMeta>,
}

/// Envelope without a payload, used by deletes and OTP endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

/// Payload of the count endpoints
#[derive(Debug, Serialize, ToSchema)]
pub struct CountResponse {
    pub count: i64,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            pagination: None,
        }
    }

    /// Envelope whose `success` flag is decided by the caller, e.g. the
    /// status advance that reports a completed record as a non-event.
    pub fn with_outcome(success: bool, message: impl Into<String>, data: T) -> Self {
        Self {
            success,
            message: message.into(),
            data: Some(data),
            pagination: None,
        }
    }
}

impl<T: Serialize> ApiResponse<Vec<T>> {
    pub fn paginated(message: impl Into<String>, page: Page<T>) -> Self {
        let pagination = page.meta();
        Self {
            success: true,
            message: message.into(),
            data: Some(page.items),
            pagination: Some(pagination),
        }
    }
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

impl IntoResponse for MessageResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cradle_core::PageRequest;

    #[test]
    fn test_paginated_envelope() {
        let page = Page::new(vec!["a", "b"], 12, PageRequest::new(2, 5).unwrap());
        let json = serde_json::to_value(ApiResponse::paginated("Listed", page)).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"].as_array().unwrap().len(), 2);
        assert_eq!(json["pagination"]["total"], 12);
        assert_eq!(json["pagination"]["page_count"], 3);
    }

    #[test]
    fn test_plain_envelope_omits_pagination() {
        let json = serde_json::to_value(ApiResponse::ok("Fetched", 1)).unwrap();
        assert!(json.get("pagination").is_none());
        assert_eq!(json["data"], 1);
    }
}
