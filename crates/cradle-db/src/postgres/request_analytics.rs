use async_trait::async_trait;
use cradle_core::models::{
    ListScope, NewRequestAnalytics, RequestAnalytics, RequestAnalyticsPatch, RequestStatus,
};
use cradle_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use crate::repository::RequestAnalyticsRepository;

const COLUMNS: &str = "id, user_id, business_id, category_id, request_type_id, data_title, \
    data_description, data_type, data_consent, data_file, output_file, status, created_at, \
    updated_at";

/// `(business_id, user_id)` equality filters for a scope.
fn scope_columns(scope: ListScope) -> (Option<Uuid>, Option<Uuid>) {
    match scope {
        ListScope::All => (None, None),
        ListScope::ByBusiness(business_id) => (Some(business_id), None),
        ListScope::ByUser(user_id) => (None, Some(user_id)),
    }
}

/// Repository for request analytics records
#[derive(Clone)]
pub struct PostgresRequestAnalyticsRepository {
    pool: PgPool,
}

impl PostgresRequestAnalyticsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RequestAnalyticsRepository for PostgresRequestAnalyticsRepository {
    #[tracing::instrument(skip(self, record), fields(db.table = "request_analytics", db.operation = "insert", user_id = %record.user_id))]
    async fn insert(&self, record: NewRequestAnalytics) -> Result<RequestAnalytics, AppError> {
        let query = format!(
            r#"
            INSERT INTO request_analytics (
                user_id, business_id, category_id, request_type_id, data_title,
                data_description, data_type, data_consent, data_file, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {}
            "#,
            COLUMNS
        );

        let created = sqlx::query_as::<Postgres, RequestAnalytics>(&query)
            .bind(record.user_id)
            .bind(record.business_id)
            .bind(record.category_id)
            .bind(record.request_type_id)
            .bind(&record.data_title)
            .bind(&record.data_description)
            .bind(&record.data_type)
            .bind(record.data_consent)
            .bind(&record.data_file)
            .bind(RequestStatus::Pending.as_str())
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    #[tracing::instrument(skip(self), fields(db.table = "request_analytics", db.operation = "select", db.record_id = %id))]
    async fn find_by_id(&self, id: Uuid) -> Result<Option<RequestAnalytics>, AppError> {
        let query = format!("SELECT {} FROM request_analytics WHERE id = $1", COLUMNS);
        let record = sqlx::query_as::<Postgres, RequestAnalytics>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(record)
    }

    #[tracing::instrument(skip(self), fields(db.table = "request_analytics", db.operation = "select"))]
    async fn list(
        &self,
        scope: ListScope,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<RequestAnalytics>, AppError> {
        let (business_id, user_id) = scope_columns(scope);
        let query = format!(
            r#"
            SELECT {}
            FROM request_analytics
            WHERE ($1::uuid IS NULL OR business_id = $1)
              AND ($2::uuid IS NULL OR user_id = $2)
            ORDER BY created_at ASC, id ASC
            LIMIT $3 OFFSET $4
            "#,
            COLUMNS
        );

        let records = sqlx::query_as::<Postgres, RequestAnalytics>(&query)
            .bind(business_id)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(records)
    }

    #[tracing::instrument(skip(self), fields(db.table = "request_analytics", db.operation = "count"))]
    async fn count(&self, scope: ListScope) -> Result<i64, AppError> {
        let (business_id, user_id) = scope_columns(scope);
        let count = sqlx::query_scalar::<Postgres, i64>(
            r#"
            SELECT COUNT(*)
            FROM request_analytics
            WHERE ($1::uuid IS NULL OR business_id = $1)
              AND ($2::uuid IS NULL OR user_id = $2)
            "#,
        )
        .bind(business_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    #[tracing::instrument(skip(self, patch), fields(db.table = "request_analytics", db.operation = "update", db.record_id = %id))]
    async fn update(
        &self,
        id: Uuid,
        patch: RequestAnalyticsPatch,
    ) -> Result<Option<RequestAnalytics>, AppError> {
        let query = format!(
            r#"
            UPDATE request_analytics SET
                category_id = COALESCE($2, category_id),
                request_type_id = COALESCE($3, request_type_id),
                data_title = COALESCE($4, data_title),
                data_description = COALESCE($5, data_description),
                data_type = COALESCE($6, data_type),
                data_consent = COALESCE($7, data_consent),
                data_file = COALESCE($8, data_file),
                output_file = COALESCE($9, output_file),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            COLUMNS
        );

        let record = sqlx::query_as::<Postgres, RequestAnalytics>(&query)
            .bind(id)
            .bind(patch.category_id)
            .bind(patch.request_type_id)
            .bind(patch.data_title)
            .bind(patch.data_description)
            .bind(patch.data_type)
            .bind(patch.data_consent)
            .bind(patch.data_file)
            .bind(patch.output_file)
            .fetch_optional(&self.pool)
            .await?;

        Ok(record)
    }

    #[tracing::instrument(skip(self), fields(db.table = "request_analytics", db.operation = "update", db.record_id = %id, to = %new_status))]
    async fn update_status_if(
        &self,
        id: Uuid,
        expected: &str,
        new_status: RequestStatus,
    ) -> Result<Option<RequestAnalytics>, AppError> {
        let query = format!(
            r#"
            UPDATE request_analytics
            SET status = $3, updated_at = NOW()
            WHERE id = $1 AND status = $2
            RETURNING {}
            "#,
            COLUMNS
        );

        let record = sqlx::query_as::<Postgres, RequestAnalytics>(&query)
            .bind(id)
            .bind(expected)
            .bind(new_status.as_str())
            .fetch_optional(&self.pool)
            .await?;

        Ok(record)
    }

    #[tracing::instrument(skip(self), fields(db.table = "request_analytics", db.operation = "delete", db.record_id = %id))]
    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM request_analytics WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
