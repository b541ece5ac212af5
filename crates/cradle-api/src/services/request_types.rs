use crate::auth::AuthContext;
use cradle_core::models::{RequestType, CreateRequestTypeRequest, UpdateRequestTypeRequest};
use cradle_core::AppError;
use cradle_db::RequestTypeRepository;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct RequestTypeService {
    repo: Arc<dyn RequestTypeRepository>,
}

fn name_taken(err: AppError) -> AppError {
    match err {
        AppError::Conflict(_) => AppError::Conflict("Request type name already exists".to_string()),
        other => other,
    }
}

impl RequestTypeService {
    pub fn new(repo: Arc<dyn RequestTypeRepository>) -> Self {
        Self { repo }
    }

    pub async fn create(
        &self,
        actor: &AuthContext,
        request: CreateRequestTypeRequest,
    ) -> Result<RequestType, AppError> {
        actor.require_admin()?;
        let request_type = self
            .repo
            .insert(request.name.trim(), &request.description)
            .await
            .map_err(name_taken)?;
        tracing::info!(request_type_id = %request_type.id, name = %request_type.name, "Request type created");
        Ok(request_type)
    }

    pub async fn get(&self, id: Uuid) -> Result<RequestType, AppError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Request type not found".to_string()))
    }

    pub async fn list(&self) -> Result<Vec<RequestType>, AppError> {
        self.repo.list().await
    }

    pub async fn update(
        &self,
        actor: &AuthContext,
        id: Uuid,
        request: UpdateRequestTypeRequest,
    ) -> Result<RequestType, AppError> {
        actor.require_admin()?;
        let mut request_type = self.get(id).await?;
        request.apply(&mut request_type);
        self.repo
            .update(&request_type)
            .await
            .map_err(name_taken)?
            .ok_or_else(|| AppError::NotFound("Request type not found".to_string()))
    }

    pub async fn delete(&self, actor: &AuthContext, id: Uuid) -> Result<(), AppError> {
        actor.require_admin()?;
        if !self.repo.delete(id).await? {
            return Err(AppError::NotFound("Request type not found".to_string()));
        }
        tracing::info!(request_type_id = %id, "Request type deleted");
        Ok(())
    }
}
