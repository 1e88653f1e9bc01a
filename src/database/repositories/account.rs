//! Account repository implementation

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::account::{Account, CreateAccountRequest, UpdateAccountRequest};
use crate::utils::errors::CommitteeHubError;

#[derive(Debug, Clone)]
pub struct AccountRepository {
    pool: PgPool,
}

impl AccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new account
    pub async fn create(&self, request: CreateAccountRequest) -> Result<Account, CommitteeHubError> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (id, email, password_hash, display_name, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, email, password_hash, display_name, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(request.email)
        .bind(request.password_hash)
        .bind(request.display_name)
        .bind(Utc::now())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(account)
    }

    /// Find account by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, CommitteeHubError> {
        let account = sqlx::query_as::<_, Account>(
            "SELECT id, email, password_hash, display_name, created_at, updated_at FROM accounts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    /// Find account by email
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Account>, CommitteeHubError> {
        let account = sqlx::query_as::<_, Account>(
            "SELECT id, email, password_hash, display_name, created_at, updated_at FROM accounts WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    /// Update account
    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateAccountRequest,
    ) -> Result<Account, CommitteeHubError> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            UPDATE accounts
            SET display_name = COALESCE($2, display_name),
                password_hash = COALESCE($3, password_hash),
                updated_at = $4
            WHERE id = $1
            RETURNING id, email, password_hash, display_name, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(request.display_name)
        .bind(request.password_hash)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(account)
    }

    /// Check whether an email is already registered
    pub async fn email_exists(&self, email: &str) -> Result<bool, CommitteeHubError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM accounts WHERE email = $1")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0 > 0)
    }
}
