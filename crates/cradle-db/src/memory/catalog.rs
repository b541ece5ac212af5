use async_trait::async_trait;
use chrono::{DateTime, Utc};
use cradle_core::models::{Category, RequestType};
use cradle_core::AppError;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use super::{conflict, lock, Clock};
use crate::repository::{CategoryRepository, RequestTypeRepository};

/// Shape shared by the two name-keyed lookup tables.
trait NamedRecord: Clone + Send + 'static {
    fn create(id: Uuid, name: &str, description: &str, now: DateTime<Utc>) -> Self;
    fn id(&self) -> Uuid;
    fn name(&self) -> &str;
    fn overwrite(&mut self, from: &Self, now: DateTime<Utc>);
}

impl NamedRecord for Category {
    fn create(id: Uuid, name: &str, description: &str, now: DateTime<Utc>) -> Self {
        Category {
            id,
            name: name.to_string(),
            description: description.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn overwrite(&mut self, from: &Self, now: DateTime<Utc>) {
        self.name = from.name.clone();
        self.description = from.description.clone();
        self.updated_at = now;
    }
}

impl NamedRecord for RequestType {
    fn create(id: Uuid, name: &str, description: &str, now: DateTime<Utc>) -> Self {
        RequestType {
            id,
            name: name.to_string(),
            description: description.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn overwrite(&mut self, from: &Self, now: DateTime<Utc>) {
        self.name = from.name.clone();
        self.description = from.description.clone();
        self.updated_at = now;
    }
}

struct Table<T> {
    rows: Mutex<Vec<T>>,
    clock: Clock,
}

impl<T: NamedRecord> Table<T> {
    fn new() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            clock: Clock::new(),
        }
    }

    fn insert(&self, name: &str, description: &str) -> Result<T, AppError> {
        let now = self.clock.now();
        let mut rows = lock(&self.rows);
        if rows.iter().any(|r| r.name() == name) {
            return Err(conflict());
        }
        let row = T::create(Uuid::new_v4(), name, description, now);
        rows.push(row.clone());
        Ok(row)
    }

    fn find(&self, id: Uuid) -> Option<T> {
        lock(&self.rows).iter().find(|r| r.id() == id).cloned()
    }

    fn list(&self) -> Vec<T> {
        let mut rows = lock(&self.rows).clone();
        rows.sort_by(|a, b| a.name().cmp(b.name()));
        rows
    }

    fn update(&self, record: &T) -> Result<Option<T>, AppError> {
        let now = self.clock.now();
        let mut rows = lock(&self.rows);
        if rows
            .iter()
            .any(|r| r.id() != record.id() && r.name() == record.name())
        {
            return Err(conflict());
        }
        Ok(rows.iter_mut().find(|r| r.id() == record.id()).map(|row| {
            row.overwrite(record, now);
            row.clone()
        }))
    }

    fn delete(&self, id: Uuid) -> bool {
        let mut rows = lock(&self.rows);
        let before = rows.len();
        rows.retain(|r| r.id() != id);
        rows.len() < before
    }
}

#[derive(Clone)]
pub struct InMemoryCategoryRepository {
    table: Arc<Table<Category>>,
}

impl InMemoryCategoryRepository {
    pub fn new() -> Self {
        Self {
            table: Arc::new(Table::new()),
        }
    }
}

impl Default for InMemoryCategoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn insert(&self, name: &str, description: &str) -> Result<Category, AppError> {
        self.table.insert(name, description)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, AppError> {
        Ok(self.table.find(id))
    }

    async fn list(&self) -> Result<Vec<Category>, AppError> {
        Ok(self.table.list())
    }

    async fn update(&self, category: &Category) -> Result<Option<Category>, AppError> {
        self.table.update(category)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.table.delete(id))
    }
}

#[derive(Clone)]
pub struct InMemoryRequestTypeRepository {
    table: Arc<Table<RequestType>>,
}

impl InMemoryRequestTypeRepository {
    pub fn new() -> Self {
        Self {
            table: Arc::new(Table::new()),
        }
    }
}

impl Default for InMemoryRequestTypeRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RequestTypeRepository for InMemoryRequestTypeRepository {
    async fn insert(&self, name: &str, description: &str) -> Result<RequestType, AppError> {
        self.table.insert(name, description)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<RequestType>, AppError> {
        Ok(self.table.find(id))
    }

    async fn list(&self) -> Result<Vec<RequestType>, AppError> {
        Ok(self.table.list())
    }

    async fn update(&self, request_type: &RequestType) -> Result<Option<RequestType>, AppError> {
        self.table.update(request_type)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.table.delete(id))
    }
}
