use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::validation::validate_not_blank;

/// Kind of data request (e.g. "survey export", "market report")
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct RequestType {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct CreateRequestTypeRequest {
    #[serde(alias = "request_name")]
    #[validate(
        length(
            min = 1,
            max = 100,
            message = "Request type name must be between 1 and 100 characters"
        ),
        custom(function = "validate_not_blank")
    )]
    pub name: String,
    #[serde(default, alias = "request_description")]
    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: String,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema, Validate)]
pub struct UpdateRequestTypeRequest {
    #[serde(default, alias = "request_name")]
    #[validate(
        length(
            min = 1,
            max = 100,
            message = "Request type name must be between 1 and 100 characters"
        ),
        custom(function = "validate_not_blank")
    )]
    pub name: Option<String>,
    #[serde(default, alias = "request_description")]
    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,
}

impl UpdateRequestTypeRequest {
    pub fn apply(self, request_type: &mut RequestType) {
        if let Some(name) = self.name {
            request_type.name = name.trim().to_string();
        }
        if let Some(description) = self.description {
            request_type.description = description;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_legacy_field_names() {
        let req: CreateRequestTypeRequest = serde_json::from_value(serde_json::json!({
            "request_name": "survey",
            "request_description": "raw survey export"
        }))
        .unwrap();
        assert_eq!(req.name, "survey");
        assert_eq!(req.description, "raw survey export");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_blank_name_rejected() {
        let req = CreateRequestTypeRequest {
            name: "   ".to_string(),
            description: String::new(),
        };
        assert!(req.validate().is_err());
    }
}
