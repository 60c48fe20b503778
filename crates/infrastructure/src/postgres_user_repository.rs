//! PostgreSQL-backed user repository.

use async_trait::async_trait;
use sqlx::PgPool;

use tasktrail_application::UserRepository;
use tasktrail_core::{AppError, AppResult};
use tasktrail_domain::{User, UserId};

use crate::postgres_errors::{map_read_error, map_write_error};

/// PostgreSQL implementation of the user repository port.
#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: uuid::Uuid,
    name: String,
    username: String,
    password_hash: String,
}

impl TryFrom<UserRow> for User {
    type Error = AppError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        User::new(
            UserId::from_uuid(row.id),
            row.name,
            row.username,
            row.password_hash,
        )
    }
}

const USERNAME_TAKEN: &str = "Username is already taken";

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn list_users(&self) -> AppResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, username, password_hash
            FROM users
            ORDER BY username
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| map_read_error(error, "list users"))?;

        rows.into_iter().map(User::try_from).collect()
    }

    async fn find_user(&self, user_id: UserId) -> AppResult<Option<User>> {
        sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, username, password_hash
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| map_read_error(error, "find user"))?
        .map(User::try_from)
        .transpose()
    }

    async fn find_user_by_username(&self, username: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, username, password_hash
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| map_read_error(error, "find user by username"))?
        .map(User::try_from)
        .transpose()
    }

    async fn insert_user(&self, user: &User) -> AppResult<User> {
        sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, name, username, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, username, password_hash
            "#,
        )
        .bind(user.id().as_uuid())
        .bind(user.name())
        .bind(user.username())
        .bind(user.password_hash())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| map_write_error(error, "insert user", USERNAME_TAKEN))?
        .try_into()
    }

    async fn update_user(&self, user: &User) -> AppResult<User> {
        sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET name = $2, username = $3, password_hash = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, username, password_hash
            "#,
        )
        .bind(user.id().as_uuid())
        .bind(user.name())
        .bind(user.username())
        .bind(user.password_hash())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| map_write_error(error, "update user", USERNAME_TAKEN))?
        .ok_or_else(|| AppError::NotFound("User not found".to_owned()))?
        .try_into()
    }

    async fn delete_user(&self, user_id: UserId) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|error| map_write_error(error, "delete user", USERNAME_TAKEN))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("User not found".to_owned()));
        }

        Ok(())
    }
}
