//! Data request workflow: creation with an attached file, owner edits,
//! the admin-driven status lifecycle and tenant-scoped listings.

use crate::auth::AuthContext;
use crate::services::files::FileUploader;
use cradle_core::models::{
    AdvanceOutcome, CreateRequestAnalyticsRequest, ListScope, NewRequestAnalytics,
    RequestAnalytics, RequestAnalyticsPatch, Transition, UpdateRequestAnalyticsRequest, UserRole,
};
use cradle_core::{AppError, Page, PageRequest};
use cradle_db::{
    CategoryRepository, RequestAnalyticsRepository, RequestTypeRepository, UserRepository,
};
use cradle_storage::keys::REQUEST_FILES;
use std::sync::Arc;
use uuid::Uuid;

/// Repositories the workflow reads from or writes to
#[derive(Clone)]
pub struct RequestAnalyticsDeps {
    pub records: Arc<dyn RequestAnalyticsRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub request_types: Arc<dyn RequestTypeRepository>,
    pub users: Arc<dyn UserRepository>,
}

#[derive(Clone)]
pub struct RequestAnalyticsService {
    records: Arc<dyn RequestAnalyticsRepository>,
    categories: Arc<dyn CategoryRepository>,
    request_types: Arc<dyn RequestTypeRepository>,
    users: Arc<dyn UserRepository>,
    files: FileUploader,
}

fn not_found() -> AppError {
    AppError::NotFound("Request analytics not found".to_string())
}

fn forbidden() -> AppError {
    AppError::Forbidden("You do not have access to this request".to_string())
}

impl RequestAnalyticsService {
    pub fn new(deps: RequestAnalyticsDeps, files: FileUploader) -> Self {
        Self {
            records: deps.records,
            categories: deps.categories,
            request_types: deps.request_types,
            users: deps.users,
            files,
        }
    }

    /// Admins reach every record, a business the records of its tenant,
    /// a sub-user only its own.
    fn can_access(actor: &AuthContext, record: &RequestAnalytics) -> bool {
        match actor.role {
            UserRole::Admin => true,
            UserRole::Business => record.business_id == Some(actor.user_id),
            UserRole::User => record.user_id == actor.user_id,
        }
    }

    async fn load_accessible(
        &self,
        actor: &AuthContext,
        id: Uuid,
    ) -> Result<RequestAnalytics, AppError> {
        let record = self.records.find_by_id(id).await?.ok_or_else(not_found)?;
        if !Self::can_access(actor, &record) {
            return Err(forbidden());
        }
        Ok(record)
    }

    async fn ensure_references(
        &self,
        category_id: Option<Uuid>,
        request_type_id: Option<Uuid>,
    ) -> Result<(), AppError> {
        if let Some(id) = category_id {
            if self.categories.find_by_id(id).await?.is_none() {
                return Err(AppError::NotFound("Category not found".to_string()));
            }
        }
        if let Some(id) = request_type_id {
            if self.request_types.find_by_id(id).await?.is_none() {
                return Err(AppError::NotFound("Request type not found".to_string()));
            }
        }
        Ok(())
    }

    /// Fail with `Forbidden` unless the caller may read the given scope.
    async fn authorize_scope(&self, actor: &AuthContext, scope: ListScope) -> Result<(), AppError> {
        if actor.is_admin() {
            return Ok(());
        }
        let allowed = match scope {
            ListScope::All => false,
            ListScope::ByBusiness(business_id) => {
                actor.is_business() && actor.user_id == business_id
            }
            ListScope::ByUser(user_id) if user_id == actor.user_id => true,
            ListScope::ByUser(user_id) => {
                actor.is_business()
                    && self
                        .users
                        .find_by_id(user_id)
                        .await?
                        .is_some_and(|u| u.business_user_id == Some(actor.user_id))
            }
        };
        if allowed {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "You do not have access to these requests".to_string(),
            ))
        }
    }

    /// Submit a data request: decode the file, upload it, then persist the
    /// record with status `pending`. A failed insert removes the uploaded object.
    #[tracing::instrument(skip(self, actor, request), fields(actor_id = %actor.user_id))]
    pub async fn create(
        &self,
        actor: &AuthContext,
        request: CreateRequestAnalyticsRequest,
    ) -> Result<RequestAnalytics, AppError> {
        let file = self.files.decode(&request.data_file)?;

        let owner = match request.user_id {
            Some(user_id) if user_id != actor.user_id => {
                if !actor.is_admin() {
                    return Err(AppError::Forbidden(
                        "Only administrators can submit requests for another user".to_string(),
                    ));
                }
                self.users
                    .find_by_id(user_id)
                    .await?
                    .ok_or_else(|| AppError::NotFound("User not found".to_string()))?
            }
            _ => self
                .users
                .find_by_id(actor.user_id)
                .await?
                .ok_or_else(|| AppError::NotFound("User not found".to_string()))?,
        };

        self.ensure_references(Some(request.category_id), Some(request.request_type_id))
            .await?;

        let stored = self.files.store(REQUEST_FILES, file).await?;

        let new_record = NewRequestAnalytics {
            user_id: owner.id,
            business_id: owner.owning_business_id(),
            category_id: request.category_id,
            request_type_id: request.request_type_id,
            data_title: request.data_title.trim().to_string(),
            data_description: request.data_description,
            data_type: request.data_type,
            data_consent: request.data_consent,
            data_file: stored.url.clone(),
        };

        match self.records.insert(new_record).await {
            Ok(record) => {
                tracing::info!(
                    request_id = %record.id,
                    user_id = %record.user_id,
                    "Request analytics created"
                );
                Ok(record)
            }
            Err(e) => {
                tracing::warn!(error = %e, key = %stored.key, "Insert failed, removing uploaded file");
                self.files.discard(&stored.key).await;
                Err(e)
            }
        }
    }

    /// Owner edit. Replacement files are uploaded before the row is touched,
    /// so a failed upload leaves the record as it was.
    #[tracing::instrument(skip(self, actor, request), fields(actor_id = %actor.user_id))]
    pub async fn update(
        &self,
        actor: &AuthContext,
        id: Uuid,
        request: UpdateRequestAnalyticsRequest,
    ) -> Result<RequestAnalytics, AppError> {
        let existing = self.load_accessible(actor, id).await?;

        if !actor.is_admin() {
            if request.output_file.is_some() {
                return Err(AppError::Forbidden(
                    "Only administrators can attach an output file".to_string(),
                ));
            }
            if existing.is_completed() {
                return Err(AppError::InvalidState(
                    "Completed requests can no longer be edited".to_string(),
                ));
            }
        }

        let data_file = request
            .data_file
            .as_deref()
            .map(|raw| self.files.decode(raw))
            .transpose()?;
        let output_file = request
            .output_file
            .as_deref()
            .map(|raw| self.files.decode(raw))
            .transpose()?;

        self.ensure_references(request.category_id, request.request_type_id)
            .await?;

        let mut uploaded = Vec::new();
        let mut patch = RequestAnalyticsPatch {
            category_id: request.category_id,
            request_type_id: request.request_type_id,
            data_title: request.data_title.map(|t| t.trim().to_string()),
            data_description: request.data_description,
            data_type: request.data_type,
            data_consent: request.data_consent,
            data_file: None,
            output_file: None,
        };

        if let Some(file) = data_file {
            let stored = self.files.store(REQUEST_FILES, file).await?;
            patch.data_file = Some(stored.url.clone());
            uploaded.push(stored.key);
        }
        if let Some(file) = output_file {
            let stored = match self.files.store(REQUEST_FILES, file).await {
                Ok(stored) => stored,
                Err(e) => {
                    for key in &uploaded {
                        self.files.discard(key).await;
                    }
                    return Err(e);
                }
            };
            patch.output_file = Some(stored.url.clone());
            uploaded.push(stored.key);
        }

        if patch.is_empty() {
            return Ok(existing);
        }

        let replaced: Vec<String> = [
            patch.data_file.as_ref().map(|_| existing.data_file.clone()),
            patch
                .output_file
                .as_ref()
                .and_then(|_| existing.output_file.clone()),
        ]
        .into_iter()
        .flatten()
        .collect();

        let updated = match self.records.update(id, patch).await {
            Ok(Some(record)) => Ok(record),
            Ok(None) => Err(not_found()),
            Err(e) => Err(e),
        };
        let updated = match updated {
            Ok(record) => record,
            Err(e) => {
                for key in &uploaded {
                    self.files.discard(key).await;
                }
                return Err(e);
            }
        };

        for url in &replaced {
            self.files.discard_url(url).await;
        }

        tracing::info!(request_id = %id, "Request analytics updated");
        Ok(updated)
    }

    /// Move a record one step along pending → in progress → completed.
    /// A completed record is returned unchanged with `advanced = false`.
    #[tracing::instrument(skip(self, actor), fields(actor_id = %actor.user_id))]
    pub async fn advance(&self, actor: &AuthContext, id: Uuid) -> Result<AdvanceOutcome, AppError> {
        actor.require_admin()?;
        let record = self.records.find_by_id(id).await?.ok_or_else(not_found)?;

        match Transition::plan(&record.status)? {
            Transition::AlreadyCompleted => Ok(AdvanceOutcome {
                record,
                advanced: false,
                message: "Request is already completed".to_string(),
            }),
            Transition::Advanced { from, to } => {
                let updated = self
                    .records
                    .update_status_if(id, &record.status, to)
                    .await?
                    .ok_or_else(|| {
                        tracing::warn!(request_id = %id, expected = %from, "Status changed concurrently");
                        AppError::Conflict(
                            "Request status was changed concurrently, please retry".to_string(),
                        )
                    })?;

                tracing::info!(request_id = %id, from = %from, to = %to, "Request status advanced");
                Ok(AdvanceOutcome {
                    record: updated,
                    advanced: true,
                    message: format!("Request status updated from {} to {}", from, to),
                })
            }
        }
    }

    pub async fn get(&self, actor: &AuthContext, id: Uuid) -> Result<RequestAnalytics, AppError> {
        self.load_accessible(actor, id).await
    }

    #[tracing::instrument(skip(self, actor), fields(actor_id = %actor.user_id))]
    pub async fn delete(&self, actor: &AuthContext, id: Uuid) -> Result<(), AppError> {
        let record = self.load_accessible(actor, id).await?;
        if !self.records.delete(id).await? {
            return Err(not_found());
        }

        self.files.discard_url(&record.data_file).await;
        if let Some(ref output) = record.output_file {
            self.files.discard_url(output).await;
        }

        tracing::info!(request_id = %id, "Request analytics deleted");
        Ok(())
    }

    pub async fn list(
        &self,
        actor: &AuthContext,
        scope: ListScope,
        request: PageRequest,
    ) -> Result<Page<RequestAnalytics>, AppError> {
        self.authorize_scope(actor, scope).await?;
        let items = self
            .records
            .list(scope, request.offset(), request.limit())
            .await?;
        let total = self.records.count(scope).await?;
        Ok(Page::new(items, total, request))
    }

    pub async fn count_all(&self, actor: &AuthContext) -> Result<i64, AppError> {
        actor.require_admin()?;
        self.records.count(ListScope::All).await
    }

    pub async fn count_by_user(&self, actor: &AuthContext, user_id: Uuid) -> Result<i64, AppError> {
        let scope = ListScope::ByUser(user_id);
        self.authorize_scope(actor, scope).await?;
        self.records.count(scope).await
    }
}
