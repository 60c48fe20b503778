use chrono::{DateTime, Utc};
use serde::Serialize;
use tasktrail_core::{AppError, AppResult, NonEmptyString};

use crate::ids::entity_id;
use crate::{User, UserId};

entity_id!(
    /// Unique identifier for a task record.
    TaskId,
    "task"
);

/// Task owned by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    id: TaskId,
    user_id: UserId,
    todo: NonEmptyString,
    start_date: Option<DateTime<Utc>>,
    end_date: Option<DateTime<Utc>>,
}

/// Partial update applied to an existing task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    /// Replacement owner.
    pub user_id: Option<UserId>,
    /// Replacement description.
    pub todo: Option<NonEmptyString>,
    /// Replacement start date.
    pub start_date: Option<DateTime<Utc>>,
    /// Replacement end date.
    pub end_date: Option<DateTime<Utc>>,
}

impl Task {
    /// Creates a task with validated fields.
    pub fn new(
        id: TaskId,
        user_id: UserId,
        todo: impl Into<String>,
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
    ) -> AppResult<Self> {
        let task = Self {
            id,
            user_id,
            todo: NonEmptyString::for_field("todo", todo)?,
            start_date,
            end_date,
        };
        task.validate_schedule()?;

        Ok(task)
    }

    /// Returns the task identifier.
    #[must_use]
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning user.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the task description.
    #[must_use]
    pub fn todo(&self) -> &str {
        self.todo.as_str()
    }

    /// Returns the optional start date.
    #[must_use]
    pub fn start_date(&self) -> Option<DateTime<Utc>> {
        self.start_date
    }

    /// Returns the optional end date.
    #[must_use]
    pub fn end_date(&self) -> Option<DateTime<Utc>> {
        self.end_date
    }

    /// Applies a partial update, rejecting a resulting schedule that ends before it starts.
    pub fn apply(&mut self, patch: TaskPatch) -> AppResult<()> {
        let mut patched = self.clone();
        if let Some(user_id) = patch.user_id {
            patched.user_id = user_id;
        }
        if let Some(todo) = patch.todo {
            patched.todo = todo;
        }
        if let Some(start_date) = patch.start_date {
            patched.start_date = Some(start_date);
        }
        if let Some(end_date) = patch.end_date {
            patched.end_date = Some(end_date);
        }

        patched.validate_schedule()?;
        *self = patched;
        Ok(())
    }

    fn validate_schedule(&self) -> AppResult<()> {
        if let (Some(start_date), Some(end_date)) = (self.start_date, self.end_date)
            && end_date < start_date
        {
            return Err(AppError::Validation(
                "end_date must not precede start_date".to_owned(),
            ));
        }

        Ok(())
    }
}

/// Task with its owning user embedded under `user`.
///
/// This is the shape returned to callers and captured in audit snapshots.
/// The owner's password digest is present here and removed by redaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskDetails {
    #[serde(flatten)]
    task: Task,
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<User>,
}

impl TaskDetails {
    /// Pairs a task with its owner, if the owner could be loaded.
    #[must_use]
    pub fn new(task: Task, user: Option<User>) -> Self {
        Self { task, user }
    }

    /// Returns the task.
    #[must_use]
    pub fn task(&self) -> &Task {
        &self.task
    }

    /// Returns the owning user.
    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }
}
