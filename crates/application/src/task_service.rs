use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use tasktrail_core::{ActorIdentity, AppError, AppResult, NonEmptyString};
use tasktrail_domain::{EntityKind, Snapshot, Task, TaskDetails, TaskId, TaskPatch, User, UserId};

use crate::audit_trail::AuditTrail;
use crate::{AuditRecorder, TaskRepository, UserRepository};

/// Input for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskInput {
    /// Owning user.
    pub user_id: UserId,
    /// Task description.
    pub todo: String,
    /// Optional start date.
    pub start_date: Option<DateTime<Utc>>,
    /// Optional end date.
    pub end_date: Option<DateTime<Utc>>,
}

/// Partial update for a task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateTaskInput {
    /// Replacement owner.
    pub user_id: Option<UserId>,
    /// Replacement description.
    pub todo: Option<String>,
    /// Replacement start date.
    pub start_date: Option<DateTime<Utc>>,
    /// Replacement end date.
    pub end_date: Option<DateTime<Utc>>,
}

/// Application service for tasks.
#[derive(Clone)]
pub struct TaskService {
    task_repository: Arc<dyn TaskRepository>,
    user_repository: Arc<dyn UserRepository>,
    audit_trail: AuditTrail,
}

impl TaskService {
    /// Creates a new task service.
    #[must_use]
    pub fn new(
        task_repository: Arc<dyn TaskRepository>,
        user_repository: Arc<dyn UserRepository>,
        audit_recorder: AuditRecorder,
    ) -> Self {
        Self {
            task_repository,
            user_repository,
            audit_trail: AuditTrail::new(audit_recorder),
        }
    }

    /// Lists all tasks with their owners.
    pub async fn list_tasks(&self) -> AppResult<Vec<TaskDetails>> {
        let tasks = self.task_repository.list_tasks().await?;
        let owners: HashMap<UserId, User> = self
            .user_repository
            .list_users()
            .await?
            .into_iter()
            .map(|user| (user.id(), user))
            .collect();

        Ok(tasks
            .into_iter()
            .map(|task| {
                let owner = owners.get(&task.user_id()).cloned();
                TaskDetails::new(task, owner)
            })
            .collect())
    }

    /// Creates a task for an existing user.
    pub async fn create_task(
        &self,
        actor: Option<&ActorIdentity>,
        input: CreateTaskInput,
    ) -> AppResult<TaskDetails> {
        let task = Task::new(
            TaskId::new(),
            input.user_id,
            input.todo,
            input.start_date,
            input.end_date,
        )?;
        let owner = self.require_owner(task.user_id()).await?;

        let created = TaskDetails::new(
            self.task_repository.insert_task(&task).await?,
            Some(owner),
        );

        self.audit_trail
            .created(
                actor,
                EntityKind::Tasks,
                &created.task().id().to_string(),
                &created,
            )
            .await;

        Ok(created)
    }

    /// Applies a partial update to an existing task.
    pub async fn update_task(
        &self,
        actor: Option<&ActorIdentity>,
        task_id: TaskId,
        input: UpdateTaskInput,
    ) -> AppResult<TaskDetails> {
        let mut task = self.require_task(task_id).await?;
        let current_owner = self.user_repository.find_user(task.user_id()).await?;
        let before = Snapshot::capture(&TaskDetails::new(task.clone(), current_owner.clone()))?;

        let owner = match input.user_id {
            Some(user_id) if user_id != task.user_id() => {
                Some(self.require_owner(user_id).await?)
            }
            _ => current_owner,
        };

        task.apply(TaskPatch {
            user_id: input.user_id,
            todo: input
                .todo
                .map(|todo| NonEmptyString::for_field("todo", todo))
                .transpose()?,
            start_date: input.start_date,
            end_date: input.end_date,
        })?;
        let updated = TaskDetails::new(self.task_repository.update_task(&task).await?, owner);

        self.audit_trail
            .updated(
                actor,
                EntityKind::Tasks,
                &task_id.to_string(),
                before,
                &updated,
            )
            .await;

        Ok(updated)
    }

    /// Deletes a task.
    pub async fn delete_task(&self, actor: Option<&ActorIdentity>, task_id: TaskId) -> AppResult<()> {
        let task = self.require_task(task_id).await?;
        let owner = self.user_repository.find_user(task.user_id()).await?;
        let before = Snapshot::capture(&TaskDetails::new(task, owner))?;

        self.task_repository.delete_task(task_id).await?;

        self.audit_trail
            .deleted(actor, EntityKind::Tasks, &task_id.to_string(), before)
            .await;

        Ok(())
    }

    async fn require_task(&self, task_id: TaskId) -> AppResult<Task> {
        self.task_repository
            .find_task(task_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Task not found".to_owned()))
    }

    async fn require_owner(&self, user_id: UserId) -> AppResult<User> {
        self.user_repository
            .find_user(user_id)
            .await?
            .ok_or_else(|| AppError::Validation("User not found".to_owned()))
    }
}

#[cfg(test)]
mod tests;
