use async_trait::async_trait;
use sqlx::PgPool;

use tasktrail_application::PositionRepository;
use tasktrail_core::{AppError, AppResult};
use tasktrail_domain::{Position, PositionId};

use crate::postgres_errors::{map_read_error, map_write_error};

/// PostgreSQL implementation of the position repository port.
#[derive(Clone)]
pub struct PostgresPositionRepository {
    pool: PgPool,
}

impl PostgresPositionRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PositionRow {
    id: uuid::Uuid,
    name: String,
}

impl TryFrom<PositionRow> for Position {
    type Error = AppError;

    fn try_from(row: PositionRow) -> Result<Self, Self::Error> {
        Position::new(PositionId::from_uuid(row.id), row.name)
    }
}

const NAME_TAKEN: &str = "Position name is already taken";

#[async_trait]
impl PositionRepository for PostgresPositionRepository {
    async fn list_positions(&self) -> AppResult<Vec<Position>> {
        let rows = sqlx::query_as::<_, PositionRow>("SELECT id, name FROM positions ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(|error| map_read_error(error, "list positions"))?;

        rows.into_iter().map(Position::try_from).collect()
    }

    async fn find_position(&self, position_id: PositionId) -> AppResult<Option<Position>> {
        sqlx::query_as::<_, PositionRow>("SELECT id, name FROM positions WHERE id = $1")
            .bind(position_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| map_read_error(error, "find position"))?
            .map(Position::try_from)
            .transpose()
    }

    async fn insert_position(&self, position: &Position) -> AppResult<Position> {
        sqlx::query_as::<_, PositionRow>(
            r#"
            INSERT INTO positions (id, name)
            VALUES ($1, $2)
            RETURNING id, name
            "#,
        )
        .bind(position.id().as_uuid())
        .bind(position.name())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| map_write_error(error, "insert position", NAME_TAKEN))?
        .try_into()
    }

    async fn update_position(&self, position: &Position) -> AppResult<Position> {
        sqlx::query_as::<_, PositionRow>(
            r#"
            UPDATE positions
            SET name = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name
            "#,
        )
        .bind(position.id().as_uuid())
        .bind(position.name())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| map_write_error(error, "update position", NAME_TAKEN))?
        .ok_or_else(|| AppError::NotFound("Position not found".to_owned()))?
        .try_into()
    }

    async fn delete_position(&self, position_id: PositionId) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM positions WHERE id = $1")
            .bind(position_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|error| map_write_error(error, "delete position", NAME_TAKEN))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Position not found".to_owned()));
        }

        Ok(())
    }
}
