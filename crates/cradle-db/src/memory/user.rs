use async_trait::async_trait;
use chrono::{DateTime, Utc};
use cradle_core::models::{NewUser, User, UserPatch};
use cradle_core::AppError;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use super::{conflict, lock, page, Clock};
use crate::repository::{UserFilter, UserRepository};

/// User store kept in insertion order
#[derive(Clone)]
pub struct InMemoryUserRepository {
    users: Arc<Mutex<Vec<User>>>,
    clock: Arc<Clock>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: Arc::new(Mutex::new(Vec::new())),
            clock: Arc::new(Clock::new()),
        }
    }

    /// Overwrite a stored user as-is (tests use this to age OTPs).
    pub fn put(&self, user: User) {
        let mut users = lock(&self.users);
        match users.iter_mut().find(|u| u.id == user.id) {
            Some(existing) => *existing = user,
            None => users.push(user),
        }
    }

    fn modify<F>(&self, id: Uuid, f: F) -> Option<User>
    where
        F: FnOnce(&mut User),
    {
        let now = self.clock.now();
        let mut users = lock(&self.users);
        let user = users.iter_mut().find(|u| u.id == id)?;
        f(user);
        user.updated_at = now;
        Some(user.clone())
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: NewUser) -> Result<User, AppError> {
        let now = self.clock.now();
        let email = user.email.to_lowercase();
        let mut users = lock(&self.users);
        if users.iter().any(|u| u.email == email) {
            return Err(conflict());
        }

        let created = User {
            id: Uuid::new_v4(),
            email,
            password_hash: user.password_hash,
            role: user.role,
            business_name: user.business_name,
            contact_name: user.contact_name,
            contact_number: user.contact_number,
            business_address: user.business_address,
            business_city: user.business_city,
            business_state: user.business_state,
            business_country: user.business_country,
            sector: user.sector,
            organization_size: user.organization_size,
            first_name: user.first_name,
            last_name: user.last_name,
            department: user.department,
            user_img: user.user_img,
            business_user_id: user.business_user_id,
            is_verified: user.is_verified,
            is_active: user.is_active,
            otp: user.otp,
            otp_expires_at: user.otp_expires_at,
            created_at: now,
            updated_at: now,
        };
        users.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(lock(&self.users).iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let email = email.to_lowercase();
        Ok(lock(&self.users).iter().find(|u| u.email == email).cloned())
    }

    async fn list(
        &self,
        filter: UserFilter,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<User>, AppError> {
        let users = lock(&self.users);
        let matching: Vec<User> = users.iter().filter(|u| filter.matches(u)).cloned().collect();
        Ok(page(&matching, offset, limit))
    }

    async fn count(&self, filter: UserFilter) -> Result<i64, AppError> {
        let users = lock(&self.users);
        Ok(users.iter().filter(|u| filter.matches(u)).count() as i64)
    }

    async fn update(&self, id: Uuid, patch: UserPatch) -> Result<Option<User>, AppError> {
        Ok(self.modify(id, |user| patch.apply(user)))
    }

    async fn set_otp(
        &self,
        id: Uuid,
        otp: Option<String>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<(), AppError> {
        self.modify(id, |user| {
            user.otp = otp;
            user.otp_expires_at = expires_at;
        });
        Ok(())
    }

    async fn mark_verified(&self, id: Uuid) -> Result<(), AppError> {
        self.modify(id, |user| {
            user.is_verified = true;
            user.otp = None;
            user.otp_expires_at = None;
        });
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut users = lock(&self.users);
        let before = users.len();
        users.retain(|u| u.id != id);
        Ok(users.len() < before)
    }
}
