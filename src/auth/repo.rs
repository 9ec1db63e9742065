use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    auth::repo_types::User,
    error::{AppError, AppResult},
};

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;
    async fn find_by_mobile(&self, mobile: &str) -> anyhow::Result<Option<User>>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>>;
    /// Fails with `Conflict` when the email or mobile is already taken.
    async fn create(
        &self,
        email: Option<&str>,
        mobile: Option<&str>,
        password_hash: &str,
    ) -> AppResult<User>;
}

/// A signup that lost the race against another one for the same email or
/// mobile trips the unique index; that is a conflict, not a server error.
fn insert_user_error(err: sqlx::Error) -> AppError {
    match err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Conflict("Account already registered".into())
        }
        other => anyhow::Error::new(other).context("insert user").into(),
    }
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, mobile, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await
        .context("find user by email")
    }

    async fn find_by_mobile(&self, mobile: &str) -> anyhow::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, mobile, password_hash, created_at
            FROM users
            WHERE mobile = $1
            "#,
        )
        .bind(mobile)
        .fetch_optional(&self.db)
        .await
        .context("find user by mobile")
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"SELECT id, email, mobile, password_hash, created_at FROM users WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find user by id")
    }

    async fn create(
        &self,
        email: Option<&str>,
        mobile: Option<&str>,
        password_hash: &str,
    ) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, mobile, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, email, mobile, password_hash, created_at
            "#,
        )
        .bind(email)
        .bind(mobile)
        .bind(password_hash)
        .fetch_one(&self.db)
        .await
        .map_err(insert_user_error)
    }
}
