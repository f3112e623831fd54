//! MySQL implementation of [`UserDao`].

use crate::{dao::UserDao, DatabasePoolInterface};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shaku::Component;
use sqlx::FromRow;
use std::sync::Arc;
use tracing::debug;
use user_api_core::{User, UserApiError, UserApiResult, UserId};

/// MySQL-backed user DAO.
#[derive(Component, Clone)]
#[shaku(interface = UserDao)]
pub struct MySqlUserDao {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
}

impl MySqlUserDao {
    /// Creates a new DAO over the given pool.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }
}

/// Database row representation of a user.
#[derive(Debug, FromRow)]
struct UserRow {
    id: String,
    name: Option<String>,
    address: Option<String>,
    score: Option<i32>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: UserId::new_unchecked(row.id),
            name: row.name,
            address: row.address,
            score: row.score,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl UserDao for MySqlUserDao {
    async fn find_by_id(&self, id: &UserId) -> UserApiResult<Option<User>> {
        debug!("Finding user by id: {}", id);

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, address, score, created_at, updated_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(self.pool.inner())
        .await?;

        Ok(row.map(User::from))
    }

    async fn exists(&self, id: &UserId) -> UserApiResult<bool> {
        let result: Option<i64> = sqlx::query_scalar("SELECT 1 FROM users WHERE id = ? LIMIT 1")
            .bind(id.as_str())
            .fetch_optional(self.pool.inner())
            .await?;

        Ok(result.is_some())
    }

    async fn save(&self, user: &User) -> UserApiResult<User> {
        debug!("Inserting user: {}", user.id);

        sqlx::query(
            r#"
            INSERT INTO users (id, name, address, score, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(user.id.as_str())
        .bind(&user.name)
        .bind(&user.address)
        .bind(user.score)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(self.pool.inner())
        .await?;

        Ok(user.clone())
    }

    async fn update(&self, user: &User) -> UserApiResult<User> {
        debug!("Updating user: {}", user.id);

        let result = sqlx::query(
            r#"
            UPDATE users
            SET name = ?, address = ?, score = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&user.name)
        .bind(&user.address)
        .bind(user.score)
        .bind(user.updated_at)
        .bind(user.id.as_str())
        .execute(self.pool.inner())
        .await?;

        // MySQL reports changed rows, not matched rows
        if result.rows_affected() == 0 && !self.exists(&user.id).await? {
            return Err(UserApiError::not_found("User", &user.id));
        }

        Ok(user.clone())
    }

    async fn delete(&self, id: &UserId) -> UserApiResult<bool> {
        debug!("Deleting user: {}", id);

        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id.as_str())
            .execute(self.pool.inner())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> UserApiResult<u64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool.inner())
            .await?;

        Ok(u64::try_from(total).unwrap_or_default())
    }
}

impl std::fmt::Debug for MySqlUserDao {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlUserDao").finish_non_exhaustive()
    }
}
