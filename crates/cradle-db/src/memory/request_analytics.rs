use async_trait::async_trait;
use cradle_core::models::{
    ListScope, NewRequestAnalytics, RequestAnalytics, RequestAnalyticsPatch, RequestStatus,
};
use cradle_core::AppError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use super::{lock, page, Clock};
use crate::repository::RequestAnalyticsRepository;

#[derive(Clone)]
pub struct InMemoryRequestAnalyticsRepository {
    records: Arc<Mutex<Vec<RequestAnalytics>>>,
    clock: Arc<Clock>,
    fail_next_insert: Arc<AtomicBool>,
}

impl InMemoryRequestAnalyticsRepository {
    pub fn new() -> Self {
        Self {
            records: Arc::new(Mutex::new(Vec::new())),
            clock: Arc::new(Clock::new()),
            fail_next_insert: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Make the next `insert` fail with a database error.
    pub fn fail_next_insert(&self) {
        self.fail_next_insert.store(true, Ordering::SeqCst);
    }

    /// Overwrite the raw stored status, bypassing the state machine.
    pub fn force_status(&self, id: Uuid, status: &str) {
        let mut records = lock(&self.records);
        if let Some(record) = records.iter_mut().find(|r| r.id == id) {
            record.status = status.to_string();
        }
    }

    pub fn len(&self) -> usize {
        lock(&self.records).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryRequestAnalyticsRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RequestAnalyticsRepository for InMemoryRequestAnalyticsRepository {
    async fn insert(&self, record: NewRequestAnalytics) -> Result<RequestAnalytics, AppError> {
        if self.fail_next_insert.swap(false, Ordering::SeqCst) {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }

        let now = self.clock.now();
        let created = RequestAnalytics {
            id: Uuid::new_v4(),
            user_id: record.user_id,
            business_id: record.business_id,
            category_id: record.category_id,
            request_type_id: record.request_type_id,
            data_title: record.data_title,
            data_description: record.data_description,
            data_type: record.data_type,
            data_consent: record.data_consent,
            data_file: record.data_file,
            output_file: None,
            status: RequestStatus::Pending.as_str().to_string(),
            created_at: now,
            updated_at: now,
        };
        lock(&self.records).push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<RequestAnalytics>, AppError> {
        Ok(lock(&self.records).iter().find(|r| r.id == id).cloned())
    }

    async fn list(
        &self,
        scope: ListScope,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<RequestAnalytics>, AppError> {
        let records = lock(&self.records);
        let mut matching: Vec<RequestAnalytics> =
            records.iter().filter(|r| scope.matches(r)).cloned().collect();
        matching.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));
        Ok(page(&matching, offset, limit))
    }

    async fn count(&self, scope: ListScope) -> Result<i64, AppError> {
        let records = lock(&self.records);
        Ok(records.iter().filter(|r| scope.matches(r)).count() as i64)
    }

    async fn update(
        &self,
        id: Uuid,
        patch: RequestAnalyticsPatch,
    ) -> Result<Option<RequestAnalytics>, AppError> {
        let now = self.clock.now();
        let mut records = lock(&self.records);
        Ok(records.iter_mut().find(|r| r.id == id).map(|record| {
            patch.apply(record);
            record.updated_at = now;
            record.clone()
        }))
    }

    async fn update_status_if(
        &self,
        id: Uuid,
        expected: &str,
        new_status: RequestStatus,
    ) -> Result<Option<RequestAnalytics>, AppError> {
        let now = self.clock.now();
        let mut records = lock(&self.records);
        Ok(records
            .iter_mut()
            .find(|r| r.id == id && r.status == expected)
            .map(|record| {
                record.status = new_status.as_str().to_string();
                record.updated_at = now;
                record.clone()
            }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut records = lock(&self.records);
        let before = records.len();
        records.retain(|r| r.id != id);
        Ok(records.len() < before)
    }
}
