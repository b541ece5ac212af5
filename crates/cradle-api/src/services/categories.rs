use crate::auth::AuthContext;
use cradle_core::models::{Category, CreateCategoryRequest, UpdateCategoryRequest};
use cradle_core::AppError;
use cradle_db::CategoryRepository;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct CategoryService {
    repo: Arc<dyn CategoryRepository>,
}

fn name_taken(err: AppError) -> AppError {
    match err {
        AppError::Conflict(_) => AppError::Conflict("Category name already exists".to_string()),
        other => other,
    }
}

impl CategoryService {
    pub fn new(repo: Arc<dyn CategoryRepository>) -> Self {
        Self { repo }
    }

    pub async fn create(
        &self,
        actor: &AuthContext,
        request: CreateCategoryRequest,
    ) -> Result<Category, AppError> {
        actor.require_admin()?;
        let category = self
            .repo
            .insert(request.name.trim(), &request.description)
            .await
            .map_err(name_taken)?;
        tracing::info!(category_id = %category.id, name = %category.name, "Category created");
        Ok(category)
    }

    pub async fn get(&self, id: Uuid) -> Result<Category, AppError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Category not found".to_string()))
    }

    pub async fn list(&self) -> Result<Vec<Category>, AppError> {
        self.repo.list().await
    }

    pub async fn update(
        &self,
        actor: &AuthContext,
        id: Uuid,
        request: UpdateCategoryRequest,
    ) -> Result<Category, AppError> {
        actor.require_admin()?;
        let mut category = self.get(id).await?;
        request.apply(&mut category);
        self.repo
            .update(&category)
            .await
            .map_err(name_taken)?
            .ok_or_else(|| AppError::NotFound("Category not found".to_string()))
    }

    pub async fn delete(&self, actor: &AuthContext, id: Uuid) -> Result<(), AppError> {
        actor.require_admin()?;
        if !self.repo.delete(id).await? {
            return Err(AppError::NotFound("Category not found".to_string()));
        }
        tracing::info!(category_id = %id, "Category deleted");
        Ok(())
    }
}
