use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::validation::validate_not_blank;

/// Category a data request is filed under
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request DTO for creating a category
#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct CreateCategoryRequest {
    #[serde(alias = "category_name")]
    #[validate(
        length(
            min = 1,
            max = 100,
            message = "Category name must be between 1 and 100 characters"
        ),
        custom(function = "validate_not_blank")
    )]
    pub name: String,
    #[serde(default, alias = "category_description")]
    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: String,
}

/// Request DTO for updating a category
#[derive(Debug, Clone, Default, Deserialize, ToSchema, Validate)]
pub struct UpdateCategoryRequest {
    #[serde(default, alias = "category_name")]
    #[validate(
        length(
            min = 1,
            max = 100,
            message = "Category name must be between 1 and 100 characters"
        ),
        custom(function = "validate_not_blank")
    )]
    pub name: Option<String>,
    #[serde(default, alias = "category_description")]
    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,
}

impl UpdateCategoryRequest {
    pub fn apply(self, category: &mut Category) {
        if let Some(name) = self.name {
            category.name = name.trim().to_string();
        }
        if let Some(description) = self.description {
            category.description = description;
        }
    }
}
