//! Repository traits
//!
//! These abstract the document store. Services hold them as
//! `Arc<dyn ...Repository>` and never see a pool directly.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use cradle_core::models::{
    Category, ListScope, NewRequestAnalytics, NewUser, RequestAnalytics, RequestAnalyticsPatch,
    RequestStatus, RequestType, User, UserPatch, UserRole,
};
use cradle_core::AppError;
use uuid::Uuid;

/// Equality filter for user listings and counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserFilter {
    All,
    Role(UserRole),
    /// Sub-users (role `user`) created by the given business
    SubUsersOf(Uuid),
}

impl UserFilter {
    /// `(role, business_user_id)` column filters; `None` means unfiltered.
    pub fn columns(&self) -> (Option<UserRole>, Option<Uuid>) {
        match self {
            UserFilter::All => (None, None),
            UserFilter::Role(role) => (Some(*role), None),
            UserFilter::SubUsersOf(business_id) => (Some(UserRole::User), Some(*business_id)),
        }
    }

    pub fn matches(&self, user: &User) -> bool {
        let (role, business_user_id) = self.columns();
        role.is_none_or(|r| user.role == r)
            && business_user_id.is_none_or(|b| user.business_user_id == Some(b))
    }
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user. A taken email yields `AppError::Conflict`.
    async fn insert(&self, user: NewUser) -> Result<User, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;

    /// Lookup by email; emails are stored lowercased.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn list(&self, filter: UserFilter, offset: i64, limit: i64)
        -> Result<Vec<User>, AppError>;

    async fn count(&self, filter: UserFilter) -> Result<i64, AppError>;

    /// Apply a patch. Returns `None` when the id is unknown.
    async fn update(&self, id: Uuid, patch: UserPatch) -> Result<Option<User>, AppError>;

    /// Replace (or clear) the pending OTP and its expiry.
    async fn set_otp(
        &self,
        id: Uuid,
        otp: Option<String>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<(), AppError>;

    /// Mark the account verified and clear the OTP.
    async fn mark_verified(&self, id: Uuid) -> Result<(), AppError>;

    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Insert a category. A taken name yields `AppError::Conflict`.
    async fn insert(&self, name: &str, description: &str) -> Result<Category, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, AppError>;

    /// All categories ordered by name
    async fn list(&self) -> Result<Vec<Category>, AppError>;

    /// Write name and description back. Returns `None` when the id is unknown.
    async fn update(&self, category: &Category) -> Result<Option<Category>, AppError>;

    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}

#[async_trait]
pub trait RequestTypeRepository: Send + Sync {
    /// Insert a request type. A taken name yields `AppError::Conflict`.
    async fn insert(&self, name: &str, description: &str) -> Result<RequestType, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<RequestType>, AppError>;

    /// All request types ordered by name
    async fn list(&self) -> Result<Vec<RequestType>, AppError>;

    async fn update(&self, request_type: &RequestType) -> Result<Option<RequestType>, AppError>;

    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}

#[async_trait]
pub trait RequestAnalyticsRepository: Send + Sync {
    /// Persist a new record with status `pending`.
    async fn insert(&self, record: NewRequestAnalytics) -> Result<RequestAnalytics, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<RequestAnalytics>, AppError>;

    /// Records matching `scope` in creation order (`created_at`, then `id`).
    async fn list(
        &self,
        scope: ListScope,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<RequestAnalytics>, AppError>;

    async fn count(&self, scope: ListScope) -> Result<i64, AppError>;

    /// Merge a patch over the stored record. Returns `None` when the id is unknown.
    async fn update(
        &self,
        id: Uuid,
        patch: RequestAnalyticsPatch,
    ) -> Result<Option<RequestAnalytics>, AppError>;

    /// Compare-and-set the status: writes `new_status` only if the stored value
    /// still equals `expected`. Returns `None` when no row matched.
    async fn update_status_if(
        &self,
        id: Uuid,
        expected: &str,
        new_status: RequestStatus,
    ) -> Result<Option<RequestAnalytics>, AppError>;

    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}
