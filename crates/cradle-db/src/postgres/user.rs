use async_trait::async_trait;
use chrono::{DateTime, Utc};
use cradle_core::models::{NewUser, User, UserPatch};
use cradle_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use crate::repository::{UserFilter, UserRepository};

const USER_COLUMNS: &str = "id, email, password_hash, role, business_name, contact_name, \
    contact_number, business_address, business_city, business_state, business_country, \
    sector, organization_size, first_name, last_name, department, user_img, business_user_id, \
    is_verified, is_active, otp, otp_expires_at, created_at, updated_at";

/// Repository for businesses, sub-users and admins
#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    #[tracing::instrument(skip(self, user), fields(db.table = "users", db.operation = "insert"))]
    async fn insert(&self, user: NewUser) -> Result<User, AppError> {
        let query = format!(
            r#"
            INSERT INTO users (
                email, password_hash, role, business_name, contact_name, contact_number,
                business_address, business_city, business_state, business_country, sector,
                organization_size, first_name, last_name, department, user_img,
                business_user_id, is_verified, is_active, otp, otp_expires_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16,
                    $17, $18, $19, $20, $21)
            RETURNING {}
            "#,
            USER_COLUMNS
        );

        let user = sqlx::query_as::<Postgres, User>(&query)
            .bind(user.email.to_lowercase())
            .bind(&user.password_hash)
            .bind(user.role)
            .bind(&user.business_name)
            .bind(&user.contact_name)
            .bind(&user.contact_number)
            .bind(&user.business_address)
            .bind(&user.business_city)
            .bind(&user.business_state)
            .bind(&user.business_country)
            .bind(&user.sector)
            .bind(&user.organization_size)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.department)
            .bind(&user.user_img)
            .bind(user.business_user_id)
            .bind(user.is_verified)
            .bind(user.is_active)
            .bind(&user.otp)
            .bind(user.otp_expires_at)
            .fetch_one(&self.pool)
            .await?;

        Ok(user)
    }

    #[tracing::instrument(skip(self), fields(db.table = "users", db.operation = "select", db.record_id = %id))]
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let query = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let user = sqlx::query_as::<Postgres, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    #[tracing::instrument(skip(self), fields(db.table = "users", db.operation = "select"))]
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let query = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        let user = sqlx::query_as::<Postgres, User>(&query)
            .bind(email.to_lowercase())
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    #[tracing::instrument(skip(self), fields(db.table = "users", db.operation = "select"))]
    async fn list(
        &self,
        filter: UserFilter,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<User>, AppError> {
        let (role, business_user_id) = filter.columns();
        let query = format!(
            r#"
            SELECT {}
            FROM users
            WHERE ($1::user_role IS NULL OR role = $1)
              AND ($2::uuid IS NULL OR business_user_id = $2)
            ORDER BY created_at ASC, id ASC
            LIMIT $3 OFFSET $4
            "#,
            USER_COLUMNS
        );

        let users = sqlx::query_as::<Postgres, User>(&query)
            .bind(role)
            .bind(business_user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }

    #[tracing::instrument(skip(self), fields(db.table = "users", db.operation = "count"))]
    async fn count(&self, filter: UserFilter) -> Result<i64, AppError> {
        let (role, business_user_id) = filter.columns();
        let count = sqlx::query_scalar::<Postgres, i64>(
            r#"
            SELECT COUNT(*)
            FROM users
            WHERE ($1::user_role IS NULL OR role = $1)
              AND ($2::uuid IS NULL OR business_user_id = $2)
            "#,
        )
        .bind(role)
        .bind(business_user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    #[tracing::instrument(skip(self, patch), fields(db.table = "users", db.operation = "update", db.record_id = %id))]
    async fn update(&self, id: Uuid, patch: UserPatch) -> Result<Option<User>, AppError> {
        let query = format!(
            r#"
            UPDATE users SET
                password_hash = COALESCE($2, password_hash),
                business_name = COALESCE($3, business_name),
                contact_name = COALESCE($4, contact_name),
                contact_number = COALESCE($5, contact_number),
                business_address = COALESCE($6, business_address),
                business_city = COALESCE($7, business_city),
                business_state = COALESCE($8, business_state),
                business_country = COALESCE($9, business_country),
                sector = COALESCE($10, sector),
                organization_size = COALESCE($11, organization_size),
                first_name = COALESCE($12, first_name),
                last_name = COALESCE($13, last_name),
                department = COALESCE($14, department),
                user_img = COALESCE($15, user_img),
                is_active = COALESCE($16, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        );

        let user = sqlx::query_as::<Postgres, User>(&query)
            .bind(id)
            .bind(patch.password_hash)
            .bind(patch.business_name)
            .bind(patch.contact_name)
            .bind(patch.contact_number)
            .bind(patch.business_address)
            .bind(patch.business_city)
            .bind(patch.business_state)
            .bind(patch.business_country)
            .bind(patch.sector)
            .bind(patch.organization_size)
            .bind(patch.first_name)
            .bind(patch.last_name)
            .bind(patch.department)
            .bind(patch.user_img)
            .bind(patch.is_active)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    #[tracing::instrument(skip(self, otp), fields(db.table = "users", db.operation = "update", db.record_id = %id))]
    async fn set_otp(
        &self,
        id: Uuid,
        otp: Option<String>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE users SET otp = $2, otp_expires_at = $3, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(otp)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    #[tracing::instrument(skip(self), fields(db.table = "users", db.operation = "update", db.record_id = %id))]
    async fn mark_verified(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE users
            SET is_verified = TRUE, otp = NULL, otp_expires_at = NULL, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    #[tracing::instrument(skip(self), fields(db.table = "users", db.operation = "delete", db.record_id = %id))]
    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

