//! Entity Store ports.
//!
//! Every write method returns the row as stored, so services can snapshot the
//! committed state without a second read.

use async_trait::async_trait;

use tasktrail_core::AppResult;
use tasktrail_domain::{
    Position, PositionId, Task, TaskId, User, UserId, UserPosition, UserPositionId,
};

/// Repository port for user persistence.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Lists all users ordered by username.
    async fn list_users(&self) -> AppResult<Vec<User>>;

    /// Finds a user by identifier.
    async fn find_user(&self, user_id: UserId) -> AppResult<Option<User>>;

    /// Finds a user by unique login name.
    async fn find_user_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// Inserts a new user. Duplicate usernames fail with `Conflict`.
    async fn insert_user(&self, user: &User) -> AppResult<User>;

    /// Overwrites an existing user. A missing row fails with `NotFound`.
    async fn update_user(&self, user: &User) -> AppResult<User>;

    /// Removes a user. A missing row fails with `NotFound`; a referenced row with `Conflict`.
    async fn delete_user(&self, user_id: UserId) -> AppResult<()>;
}

/// Repository port for task persistence.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Lists all tasks.
    async fn list_tasks(&self) -> AppResult<Vec<Task>>;

    /// Finds a task by identifier.
    async fn find_task(&self, task_id: TaskId) -> AppResult<Option<Task>>;

    /// Inserts a new task.
    async fn insert_task(&self, task: &Task) -> AppResult<Task>;

    /// Overwrites an existing task.
    async fn update_task(&self, task: &Task) -> AppResult<Task>;

    /// Removes a task.
    async fn delete_task(&self, task_id: TaskId) -> AppResult<()>;
}

/// Repository port for position persistence.
#[async_trait]
pub trait PositionRepository: Send + Sync {
    /// Lists all positions ordered by name.
    async fn list_positions(&self) -> AppResult<Vec<Position>>;

    /// Finds a position by identifier.
    async fn find_position(&self, position_id: PositionId) -> AppResult<Option<Position>>;

    /// Inserts a new position. Duplicate names fail with `Conflict`.
    async fn insert_position(&self, position: &Position) -> AppResult<Position>;

    /// Overwrites an existing position.
    async fn update_position(&self, position: &Position) -> AppResult<Position>;

    /// Removes a position.
    async fn delete_position(&self, position_id: PositionId) -> AppResult<()>;
}

/// Repository port for user-position assignments.
#[async_trait]
pub trait UserPositionRepository: Send + Sync {
    /// Lists all assignments.
    async fn list_user_positions(&self) -> AppResult<Vec<UserPosition>>;

    /// Finds an assignment by identifier.
    async fn find_user_position(
        &self,
        user_position_id: UserPositionId,
    ) -> AppResult<Option<UserPosition>>;

    /// Finds the assignment linking a user to a position, if any.
    async fn find_assignment(
        &self,
        user_id: UserId,
        position_id: PositionId,
    ) -> AppResult<Option<UserPosition>>;

    /// Inserts a new assignment. Duplicate pairs fail with `Conflict`.
    async fn insert_user_position(&self, user_position: &UserPosition)
    -> AppResult<UserPosition>;

    /// Removes an assignment.
    async fn delete_user_position(&self, user_position_id: UserPositionId) -> AppResult<()>;
}
