use async_trait::async_trait;
use cradle_core::models::RequestType;
use cradle_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use crate::repository::RequestTypeRepository;

/// Repository for request types
#[derive(Clone)]
pub struct PostgresRequestTypeRepository {
    pool: PgPool,
}

impl PostgresRequestTypeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RequestTypeRepository for PostgresRequestTypeRepository {
    #[tracing::instrument(skip(self, description), fields(db.table = "request_types", db.operation = "insert"))]
    async fn insert(&self, name: &str, description: &str) -> Result<RequestType, AppError> {
        let request_type = sqlx::query_as::<Postgres, RequestType>(
            r#"
            INSERT INTO request_types (name, description)
            VALUES ($1, $2)
            RETURNING id, name, description, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(description)
        .fetch_one(&self.pool)
        .await?;

        Ok(request_type)
    }

    #[tracing::instrument(skip(self), fields(db.table = "request_types", db.operation = "select", db.record_id = %id))]
    async fn find_by_id(&self, id: Uuid) -> Result<Option<RequestType>, AppError> {
        let request_type = sqlx::query_as::<Postgres, RequestType>(
            "SELECT id, name, description, created_at, updated_at FROM request_types WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request_type)
    }

    #[tracing::instrument(skip(self), fields(db.table = "request_types", db.operation = "select"))]
    async fn list(&self) -> Result<Vec<RequestType>, AppError> {
        let request_types = sqlx::query_as::<Postgres, RequestType>(
            "SELECT id, name, description, created_at, updated_at FROM request_types ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(request_types)
    }

    #[tracing::instrument(skip(self, request_type), fields(db.table = "request_types", db.operation = "update", db.record_id = %request_type.id))]
    async fn update(&self, request_type: &RequestType) -> Result<Option<RequestType>, AppError> {
        let updated = sqlx::query_as::<Postgres, RequestType>(
            r#"
            UPDATE request_types
            SET name = $2, description = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, description, created_at, updated_at
            "#,
        )
        .bind(request_type.id)
        .bind(&request_type.name)
        .bind(&request_type.description)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }

    #[tracing::instrument(skip(self), fields(db.table = "request_types", db.operation = "delete", db.record_id = %id))]
    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM request_types WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
