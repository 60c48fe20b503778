use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use tasktrail_application::{
    PositionRepository, TaskRepository, UserPositionRepository, UserRepository,
};
use tasktrail_core::{AppError, AppResult};
use tasktrail_domain::{
    Position, PositionId, Task, TaskId, User, UserId, UserPosition, UserPositionId,
};

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<UserId, User>,
    tasks: HashMap<TaskId, Task>,
    positions: HashMap<PositionId, Position>,
    user_positions: HashMap<UserPositionId, UserPosition>,
}

impl Tables {
    fn user_is_referenced(&self, user_id: UserId) -> bool {
        self.tasks.values().any(|task| task.user_id() == user_id)
            || self
                .user_positions
                .values()
                .any(|assignment| assignment.user_id() == user_id)
    }

    fn position_is_referenced(&self, position_id: PositionId) -> bool {
        self.user_positions
            .values()
            .any(|assignment| assignment.position_id() == position_id)
    }

    fn username_taken_by_other(&self, user: &User) -> bool {
        self.users
            .values()
            .any(|stored| stored.id() != user.id() && stored.username() == user.username())
    }

    fn position_name_taken_by_other(&self, position: &Position) -> bool {
        self.positions
            .values()
            .any(|stored| stored.id() != position.id() && stored.name() == position.name())
    }

    fn require_user(&self, user_id: UserId) -> AppResult<()> {
        if self.users.contains_key(&user_id) {
            Ok(())
        } else {
            Err(still_referenced())
        }
    }
}

/// In-memory entity store with the same uniqueness and referential rules as
/// the PostgreSQL schema. All four tables share one lock.
#[derive(Debug, Default)]
pub struct InMemoryEntityStore {
    tables: RwLock<Tables>,
}

impl InMemoryEntityStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn still_referenced() -> AppError {
    AppError::Conflict("record is still referenced".to_owned())
}

fn sorted_by<T, K: Ord>(mut values: Vec<T>, key: impl Fn(&T) -> K) -> Vec<T> {
    values.sort_by_key(|value| key(value));
    values
}

#[async_trait]
impl UserRepository for InMemoryEntityStore {
    async fn list_users(&self) -> AppResult<Vec<User>> {
        let tables = self.tables.read().await;
        Ok(sorted_by(tables.users.values().cloned().collect(), |user| {
            user.username().to_owned()
        }))
    }

    async fn find_user(&self, user_id: UserId) -> AppResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&user_id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> AppResult<Option<User>> {
        Ok(self
            .tables
            .read()
            .await
            .users
            .values()
            .find(|user| user.username() == username)
            .cloned())
    }

    async fn insert_user(&self, user: &User) -> AppResult<User> {
        let mut tables = self.tables.write().await;
        if tables.username_taken_by_other(user) || tables.users.contains_key(&user.id()) {
            return Err(AppError::Conflict("Username is already taken".to_owned()));
        }

        tables.users.insert(user.id(), user.clone());
        Ok(user.clone())
    }

    async fn update_user(&self, user: &User) -> AppResult<User> {
        let mut tables = self.tables.write().await;
        if tables.username_taken_by_other(user) {
            return Err(AppError::Conflict("Username is already taken".to_owned()));
        }

        let Some(stored) = tables.users.get_mut(&user.id()) else {
            return Err(AppError::NotFound("User not found".to_owned()));
        };
        *stored = user.clone();
        Ok(user.clone())
    }

    async fn delete_user(&self, user_id: UserId) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&user_id) {
            return Err(AppError::NotFound("User not found".to_owned()));
        }
        if tables.user_is_referenced(user_id) {
            return Err(still_referenced());
        }

        tables.users.remove(&user_id);
        Ok(())
    }
}

#[async_trait]
impl TaskRepository for InMemoryEntityStore {
    async fn list_tasks(&self) -> AppResult<Vec<Task>> {
        let tables = self.tables.read().await;
        Ok(sorted_by(tables.tasks.values().cloned().collect(), |task| {
            task.id().as_uuid()
        }))
    }

    async fn find_task(&self, task_id: TaskId) -> AppResult<Option<Task>> {
        Ok(self.tables.read().await.tasks.get(&task_id).cloned())
    }

    async fn insert_task(&self, task: &Task) -> AppResult<Task> {
        let mut tables = self.tables.write().await;
        tables.require_user(task.user_id())?;
        if tables.tasks.contains_key(&task.id()) {
            return Err(AppError::Conflict("Task already exists".to_owned()));
        }

        tables.tasks.insert(task.id(), task.clone());
        Ok(task.clone())
    }

    async fn update_task(&self, task: &Task) -> AppResult<Task> {
        let mut tables = self.tables.write().await;
        tables.require_user(task.user_id())?;

        let Some(stored) = tables.tasks.get_mut(&task.id()) else {
            return Err(AppError::NotFound("Task not found".to_owned()));
        };
        *stored = task.clone();
        Ok(task.clone())
    }

    async fn delete_task(&self, task_id: TaskId) -> AppResult<()> {
        self.tables
            .write()
            .await
            .tasks
            .remove(&task_id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound("Task not found".to_owned()))
    }
}

#[async_trait]
impl PositionRepository for InMemoryEntityStore {
    async fn list_positions(&self) -> AppResult<Vec<Position>> {
        let tables = self.tables.read().await;
        Ok(sorted_by(
            tables.positions.values().cloned().collect(),
            |position| position.name().to_owned(),
        ))
    }

    async fn find_position(&self, position_id: PositionId) -> AppResult<Option<Position>> {
        Ok(self.tables.read().await.positions.get(&position_id).cloned())
    }

    async fn insert_position(&self, position: &Position) -> AppResult<Position> {
        let mut tables = self.tables.write().await;
        if tables.position_name_taken_by_other(position)
            || tables.positions.contains_key(&position.id())
        {
            return Err(AppError::Conflict("Position name is already taken".to_owned()));
        }

        tables.positions.insert(position.id(), position.clone());
        Ok(position.clone())
    }

    async fn update_position(&self, position: &Position) -> AppResult<Position> {
        let mut tables = self.tables.write().await;
        if tables.position_name_taken_by_other(position) {
            return Err(AppError::Conflict("Position name is already taken".to_owned()));
        }

        let Some(stored) = tables.positions.get_mut(&position.id()) else {
            return Err(AppError::NotFound("Position not found".to_owned()));
        };
        *stored = position.clone();
        Ok(position.clone())
    }

    async fn delete_position(&self, position_id: PositionId) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        if !tables.positions.contains_key(&position_id) {
            return Err(AppError::NotFound("Position not found".to_owned()));
        }
        if tables.position_is_referenced(position_id) {
            return Err(still_referenced());
        }

        tables.positions.remove(&position_id);
        Ok(())
    }
}

#[async_trait]
impl UserPositionRepository for InMemoryEntityStore {
    async fn list_user_positions(&self) -> AppResult<Vec<UserPosition>> {
        let tables = self.tables.read().await;
        Ok(sorted_by(
            tables.user_positions.values().copied().collect(),
            |assignment| assignment.id().as_uuid(),
        ))
    }

    async fn find_user_position(
        &self,
        user_position_id: UserPositionId,
    ) -> AppResult<Option<UserPosition>> {
        Ok(self
            .tables
            .read()
            .await
            .user_positions
            .get(&user_position_id)
            .copied())
    }

    async fn find_assignment(
        &self,
        user_id: UserId,
        position_id: PositionId,
    ) -> AppResult<Option<UserPosition>> {
        Ok(self
            .tables
            .read()
            .await
            .user_positions
            .values()
            .find(|assignment| {
                assignment.user_id() == user_id && assignment.position_id() == position_id
            })
            .copied())
    }

    async fn insert_user_position(
        &self,
        user_position: &UserPosition,
    ) -> AppResult<UserPosition> {
        let mut tables = self.tables.write().await;
        tables.require_user(user_position.user_id())?;
        if !tables.positions.contains_key(&user_position.position_id()) {
            return Err(still_referenced());
        }
        if tables.user_positions.values().any(|assignment| {
            assignment.user_id() == user_position.user_id()
                && assignment.position_id() == user_position.position_id()
        }) {
            return Err(AppError::Conflict(
                "User is already assigned to this position".to_owned(),
            ));
        }

        tables
            .user_positions
            .insert(user_position.id(), *user_position);
        Ok(*user_position)
    }

    async fn delete_user_position(&self, user_position_id: UserPositionId) -> AppResult<()> {
        self.tables
            .write()
            .await
            .user_positions
            .remove(&user_position_id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound("User position not found".to_owned()))
    }
}
