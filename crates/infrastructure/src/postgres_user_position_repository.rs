use async_trait::async_trait;
use sqlx::PgPool;

use tasktrail_application::UserPositionRepository;
use tasktrail_core::{AppError, AppResult};
use tasktrail_domain::{PositionId, UserId, UserPosition, UserPositionId};

use crate::postgres_errors::{map_read_error, map_write_error};

/// PostgreSQL implementation of the user-position repository port.
#[derive(Clone)]
pub struct PostgresUserPositionRepository {
    pool: PgPool,
}

impl PostgresUserPositionRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserPositionRow {
    id: uuid::Uuid,
    user_id: uuid::Uuid,
    position_id: uuid::Uuid,
}

impl From<UserPositionRow> for UserPosition {
    fn from(row: UserPositionRow) -> Self {
        UserPosition::new(
            UserPositionId::from_uuid(row.id),
            UserId::from_uuid(row.user_id),
            PositionId::from_uuid(row.position_id),
        )
    }
}

const ALREADY_ASSIGNED: &str = "User is already assigned to this position";

#[async_trait]
impl UserPositionRepository for PostgresUserPositionRepository {
    async fn list_user_positions(&self) -> AppResult<Vec<UserPosition>> {
        let rows = sqlx::query_as::<_, UserPositionRow>(
            r#"
            SELECT id, user_id, position_id
            FROM user_positions
            ORDER BY created_at, id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| map_read_error(error, "list user positions"))?;

        Ok(rows.into_iter().map(UserPosition::from).collect())
    }

    async fn find_user_position(
        &self,
        user_position_id: UserPositionId,
    ) -> AppResult<Option<UserPosition>> {
        let row = sqlx::query_as::<_, UserPositionRow>(
            "SELECT id, user_id, position_id FROM user_positions WHERE id = $1",
        )
        .bind(user_position_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| map_read_error(error, "find user position"))?;

        Ok(row.map(UserPosition::from))
    }

    async fn find_assignment(
        &self,
        user_id: UserId,
        position_id: PositionId,
    ) -> AppResult<Option<UserPosition>> {
        let row = sqlx::query_as::<_, UserPositionRow>(
            r#"
            SELECT id, user_id, position_id
            FROM user_positions
            WHERE user_id = $1 AND position_id = $2
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(position_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| map_read_error(error, "find user position assignment"))?;

        Ok(row.map(UserPosition::from))
    }

    async fn insert_user_position(
        &self,
        user_position: &UserPosition,
    ) -> AppResult<UserPosition> {
        let row = sqlx::query_as::<_, UserPositionRow>(
            r#"
            INSERT INTO user_positions (id, user_id, position_id)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, position_id
            "#,
        )
        .bind(user_position.id().as_uuid())
        .bind(user_position.user_id().as_uuid())
        .bind(user_position.position_id().as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| map_write_error(error, "insert user position", ALREADY_ASSIGNED))?;

        Ok(row.into())
    }

    async fn delete_user_position(&self, user_position_id: UserPositionId) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM user_positions WHERE id = $1")
            .bind(user_position_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|error| map_write_error(error, "delete user position", ALREADY_ASSIGNED))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("User position not found".to_owned()));
        }

        Ok(())
    }
}
