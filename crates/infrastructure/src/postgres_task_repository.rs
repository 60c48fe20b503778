use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use tasktrail_application::TaskRepository;
use tasktrail_core::{AppError, AppResult};
use tasktrail_domain::{Task, TaskId, UserId};

use crate::postgres_errors::{map_read_error, map_write_error};

/// PostgreSQL implementation of the task repository port.
#[derive(Clone)]
pub struct PostgresTaskRepository {
    pool: PgPool,
}

impl PostgresTaskRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct TaskRow {
    id: uuid::Uuid,
    user_id: uuid::Uuid,
    todo: String,
    start_date: Option<DateTime<Utc>>,
    end_date: Option<DateTime<Utc>>,
}

impl TryFrom<TaskRow> for Task {
    type Error = AppError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        Task::new(
            TaskId::from_uuid(row.id),
            UserId::from_uuid(row.user_id),
            row.todo,
            row.start_date,
            row.end_date,
        )
    }
}

const TASK_EXISTS: &str = "Task already exists";

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn list_tasks(&self) -> AppResult<Vec<Task>> {
        let rows = sqlx::query_as::<_, TaskRow>(
            r#"
            SELECT id, user_id, todo, start_date, end_date
            FROM tasks
            ORDER BY created_at, id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| map_read_error(error, "list tasks"))?;

        rows.into_iter().map(Task::try_from).collect()
    }

    async fn find_task(&self, task_id: TaskId) -> AppResult<Option<Task>> {
        sqlx::query_as::<_, TaskRow>(
            r#"
            SELECT id, user_id, todo, start_date, end_date
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(task_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| map_read_error(error, "find task"))?
        .map(Task::try_from)
        .transpose()
    }

    async fn insert_task(&self, task: &Task) -> AppResult<Task> {
        sqlx::query_as::<_, TaskRow>(
            r#"
            INSERT INTO tasks (id, user_id, todo, start_date, end_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, todo, start_date, end_date
            "#,
        )
        .bind(task.id().as_uuid())
        .bind(task.user_id().as_uuid())
        .bind(task.todo())
        .bind(task.start_date())
        .bind(task.end_date())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| map_write_error(error, "insert task", TASK_EXISTS))?
        .try_into()
    }

    async fn update_task(&self, task: &Task) -> AppResult<Task> {
        sqlx::query_as::<_, TaskRow>(
            r#"
            UPDATE tasks
            SET user_id = $2, todo = $3, start_date = $4, end_date = $5, updated_at = NOW()
            WHERE id = $1
            RETURNING id, user_id, todo, start_date, end_date
            "#,
        )
        .bind(task.id().as_uuid())
        .bind(task.user_id().as_uuid())
        .bind(task.todo())
        .bind(task.start_date())
        .bind(task.end_date())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| map_write_error(error, "update task", TASK_EXISTS))?
        .ok_or_else(|| AppError::NotFound("Task not found".to_owned()))?
        .try_into()
    }

    async fn delete_task(&self, task_id: TaskId) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(task_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|error| map_write_error(error, "delete task", TASK_EXISTS))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Task not found".to_owned()));
        }

        Ok(())
    }
}
