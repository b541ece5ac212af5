//! Sub-user management and tenant-scoped user queries.

use crate::auth::password::hash_password;
use crate::auth::AuthContext;
use crate::services::files::FileUploader;
use cradle_core::models::{
    CreateUserRequest, NewUser, UpdateUserRequest, User, UserPatch, UserResponse, UserRole,
};
use cradle_core::{AppError, Page, PageRequest};
use cradle_db::{UserFilter, UserRepository};
use cradle_storage::keys::USER_IMAGES;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    files: FileUploader,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>, files: FileUploader) -> Self {
        Self { users, files }
    }

    async fn load(&self, id: Uuid) -> Result<User, AppError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// Load a user the caller is allowed to manage.
    async fn load_managed(&self, actor: &AuthContext, id: Uuid) -> Result<User, AppError> {
        let user = self.load(id).await?;
        if !actor.can_manage_user(&user) {
            return Err(AppError::Forbidden(
                "You do not have access to this user".to_string(),
            ));
        }
        Ok(user)
    }

    /// Create a verified, active sub-user owned by the caller.
    #[tracing::instrument(skip(self, actor, request), fields(actor_id = %actor.user_id))]
    pub async fn create(
        &self,
        actor: &AuthContext,
        request: CreateUserRequest,
    ) -> Result<UserResponse, AppError> {
        actor.require_role(&[UserRole::Admin, UserRole::Business])?;

        let image = self.files.decode_image(&request.user_img)?;
        if self.users.find_by_email(&request.email).await?.is_some() {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }
        let password_hash = hash_password(&request.password)?;
        let stored = self.files.store(USER_IMAGES, image).await?;

        let mut new_user =
            NewUser::with_credentials(request.email, password_hash, UserRole::User);
        new_user.first_name = Some(request.first_name);
        new_user.last_name = Some(request.last_name);
        new_user.department = Some(request.department);
        new_user.user_img = Some(stored.url.clone());
        new_user.business_user_id = Some(actor.user_id);

        match self.users.insert(new_user).await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "Sub-user created");
                Ok(user.into())
            }
            Err(e) => {
                self.files.discard(&stored.key).await;
                Err(e)
            }
        }
    }

    #[tracing::instrument(skip(self, actor, request), fields(actor_id = %actor.user_id))]
    pub async fn update(
        &self,
        actor: &AuthContext,
        id: Uuid,
        request: UpdateUserRequest,
    ) -> Result<UserResponse, AppError> {
        let existing = self.load_managed(actor, id).await?;
        if request.is_active.is_some() && !actor.is_admin() {
            return Err(AppError::Forbidden(
                "Only administrators can change account activation".to_string(),
            ));
        }

        let image = request
            .user_img
            .as_deref()
            .map(|raw| self.files.decode_image(raw))
            .transpose()?;
        let password_hash = request.password.as_deref().map(hash_password).transpose()?;

        let stored = match image {
            Some(file) => Some(self.files.store(USER_IMAGES, file).await?),
            None => None,
        };

        let patch = UserPatch {
            password_hash,
            business_name: request.business_name,
            contact_name: request.contact_name,
            contact_number: request.contact_number,
            business_address: request.business_address,
            business_city: request.business_city,
            business_state: request.business_state,
            business_country: request.business_country,
            sector: request.sector,
            organization_size: request.organization_size,
            first_name: request.first_name,
            last_name: request.last_name,
            department: request.department,
            user_img: stored.as_ref().map(|s| s.url.clone()),
            is_active: request.is_active,
        };

        let updated = match self.users.update(id, patch).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                if let Some(ref s) = stored {
                    self.files.discard(&s.key).await;
                }
                return Err(AppError::NotFound("User not found".to_string()));
            }
            Err(e) => {
                if let Some(ref s) = stored {
                    self.files.discard(&s.key).await;
                }
                return Err(e);
            }
        };

        if let (Some(_), Some(old)) = (stored, existing.user_img.as_deref()) {
            self.files.discard_url(old).await;
        }

        Ok(updated.into())
    }

    #[tracing::instrument(skip(self, actor), fields(actor_id = %actor.user_id))]
    pub async fn delete(&self, actor: &AuthContext, id: Uuid) -> Result<(), AppError> {
        let user = self.load_managed(actor, id).await?;
        if !self.users.delete(id).await? {
            return Err(AppError::NotFound("User not found".to_string()));
        }
        if let Some(url) = user.user_img.as_deref() {
            self.files.discard_url(url).await;
        }
        tracing::info!(user_id = %id, "User deleted");
        Ok(())
    }

    pub async fn get(&self, actor: &AuthContext, id: Uuid) -> Result<UserResponse, AppError> {
        self.load_managed(actor, id).await.map(UserResponse::from)
    }

    async fn page(
        &self,
        filter: UserFilter,
        request: PageRequest,
    ) -> Result<Page<UserResponse>, AppError> {
        let items = self
            .users
            .list(filter, request.offset(), request.limit())
            .await?;
        let total = self.users.count(filter).await?;
        Ok(Page::new(items, total, request).map(UserResponse::from))
    }

    pub async fn list(
        &self,
        actor: &AuthContext,
        request: PageRequest,
    ) -> Result<Page<UserResponse>, AppError> {
        actor.require_admin()?;
        self.page(UserFilter::All, request).await
    }

    /// Sub-users of one business: visible to admins and to that business.
    pub async fn list_by_business(
        &self,
        actor: &AuthContext,
        business_id: Uuid,
        request: PageRequest,
    ) -> Result<Page<UserResponse>, AppError> {
        if !(actor.is_admin() || (actor.is_business() && actor.user_id == business_id)) {
            return Err(AppError::Forbidden(
                "You do not have access to this business".to_string(),
            ));
        }
        self.page(UserFilter::SubUsersOf(business_id), request).await
    }

    pub async fn count_businesses(&self, actor: &AuthContext) -> Result<i64, AppError> {
        actor.require_admin()?;
        self.users.count(UserFilter::Role(UserRole::Business)).await
    }
}
