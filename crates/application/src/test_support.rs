use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use tasktrail_core::{ActorIdentity, AppError, AppResult};
use tasktrail_domain::{
    AuditRecord, AuditRecordId, NewAuditRecord, Position, PositionId, Task, TaskId, User, UserId,
    UserPosition, UserPositionId,
};

use crate::{
    AuditRecordRepository, AuditRecorder, PasswordHasher, PositionRepository, SESSION_TOKEN_TTL,
    SessionClaims, SessionTokenService, TaskRepository, UserPositionRepository, UserRepository,
};

pub(crate) fn actor() -> ActorIdentity {
    ActorIdentity::new("7f1c2d9e-0000-4000-8000-000000000001", "auditor")
}

#[derive(Default, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AuditMode {
    #[default]
    Accept,
    Fail,
    Hang,
}

#[derive(Default)]
pub(crate) struct FakeAuditRepository {
    pub(crate) records: Mutex<Vec<AuditRecord>>,
    pub(crate) mode: AuditMode,
}

impl FakeAuditRepository {
    pub(crate) fn with_mode(mode: AuditMode) -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            mode,
        }
    }
}

#[async_trait]
impl AuditRecordRepository for FakeAuditRepository {
    async fn append_record(&self, record: NewAuditRecord) -> AppResult<AuditRecord> {
        match self.mode {
            AuditMode::Accept => {}
            AuditMode::Fail => {
                return Err(AppError::Internal("audit store unreachable".to_owned()));
            }
            AuditMode::Hang => tokio::time::sleep(Duration::from_secs(60)).await,
        }

        let record = record.into_record(AuditRecordId::from_uuid(uuid::Uuid::new_v4()));
        self.records.lock().await.push(record.clone());
        Ok(record)
    }
}

/// Entity store fake with the same uniqueness rules as the real store.
#[derive(Default)]
pub(crate) struct FakeEntityStore {
    pub(crate) users: Mutex<HashMap<UserId, User>>,
    pub(crate) tasks: Mutex<HashMap<TaskId, Task>>,
    pub(crate) positions: Mutex<HashMap<PositionId, Position>>,
    pub(crate) user_positions: Mutex<HashMap<UserPositionId, UserPosition>>,
    pub(crate) fail_writes: bool,
}

impl FakeEntityStore {
    fn check_writable(&self) -> AppResult<()> {
        if self.fail_writes {
            return Err(AppError::Internal("entity store unavailable".to_owned()));
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for FakeEntityStore {
    async fn list_users(&self) -> AppResult<Vec<User>> {
        Ok(self.users.lock().await.values().cloned().collect())
    }

    async fn find_user(&self, user_id: UserId) -> AppResult<Option<User>> {
        Ok(self.users.lock().await.get(&user_id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .await
            .values()
            .find(|user| user.username() == username)
            .cloned())
    }

    async fn insert_user(&self, user: &User) -> AppResult<User> {
        self.check_writable()?;
        self.users.lock().await.insert(user.id(), user.clone());
        Ok(user.clone())
    }

    async fn update_user(&self, user: &User) -> AppResult<User> {
        self.check_writable()?;
        let mut users = self.users.lock().await;
        let Some(stored) = users.get_mut(&user.id()) else {
            return Err(AppError::NotFound("User not found".to_owned()));
        };
        *stored = user.clone();
        Ok(user.clone())
    }

    async fn delete_user(&self, user_id: UserId) -> AppResult<()> {
        self.check_writable()?;
        self.users
            .lock()
            .await
            .remove(&user_id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound("User not found".to_owned()))
    }
}

#[async_trait]
impl TaskRepository for FakeEntityStore {
    async fn list_tasks(&self) -> AppResult<Vec<Task>> {
        Ok(self.tasks.lock().await.values().cloned().collect())
    }

    async fn find_task(&self, task_id: TaskId) -> AppResult<Option<Task>> {
        Ok(self.tasks.lock().await.get(&task_id).cloned())
    }

    async fn insert_task(&self, task: &Task) -> AppResult<Task> {
        self.check_writable()?;
        self.tasks.lock().await.insert(task.id(), task.clone());
        Ok(task.clone())
    }

    async fn update_task(&self, task: &Task) -> AppResult<Task> {
        self.check_writable()?;
        self.tasks.lock().await.insert(task.id(), task.clone());
        Ok(task.clone())
    }

    async fn delete_task(&self, task_id: TaskId) -> AppResult<()> {
        self.check_writable()?;
        self.tasks.lock().await.remove(&task_id);
        Ok(())
    }
}

#[async_trait]
impl PositionRepository for FakeEntityStore {
    async fn list_positions(&self) -> AppResult<Vec<Position>> {
        Ok(self.positions.lock().await.values().cloned().collect())
    }

    async fn find_position(&self, position_id: PositionId) -> AppResult<Option<Position>> {
        Ok(self.positions.lock().await.get(&position_id).cloned())
    }

    async fn insert_position(&self, position: &Position) -> AppResult<Position> {
        self.check_writable()?;
        let mut positions = self.positions.lock().await;
        if positions.values().any(|stored| stored.name() == position.name()) {
            return Err(AppError::Conflict("Position name is already taken".to_owned()));
        }
        positions.insert(position.id(), position.clone());
        Ok(position.clone())
    }

    async fn update_position(&self, position: &Position) -> AppResult<Position> {
        self.check_writable()?;
        self.positions
            .lock()
            .await
            .insert(position.id(), position.clone());
        Ok(position.clone())
    }

    async fn delete_position(&self, position_id: PositionId) -> AppResult<()> {
        self.check_writable()?;
        self.positions.lock().await.remove(&position_id);
        Ok(())
    }
}

#[async_trait]
impl UserPositionRepository for FakeEntityStore {
    async fn list_user_positions(&self) -> AppResult<Vec<UserPosition>> {
        Ok(self.user_positions.lock().await.values().copied().collect())
    }

    async fn find_user_position(
        &self,
        user_position_id: UserPositionId,
    ) -> AppResult<Option<UserPosition>> {
        Ok(self
            .user_positions
            .lock()
            .await
            .get(&user_position_id)
            .copied())
    }

    async fn find_assignment(
        &self,
        user_id: UserId,
        position_id: PositionId,
    ) -> AppResult<Option<UserPosition>> {
        Ok(self
            .user_positions
            .lock()
            .await
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
        self.check_writable()?;
        self.user_positions
            .lock()
            .await
            .insert(user_position.id(), *user_position);
        Ok(*user_position)
    }

    async fn delete_user_position(&self, user_position_id: UserPositionId) -> AppResult<()> {
        self.check_writable()?;
        self.user_positions.lock().await.remove(&user_position_id);
        Ok(())
    }
}

pub(crate) struct FakePasswordHasher;

impl PasswordHasher for FakePasswordHasher {
    fn hash_password(&self, password: &str) -> AppResult<String> {
        Ok(format!("hashed:{password}"))
    }

    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        Ok(hash == format!("hashed:{password}"))
    }
}

pub(crate) struct FakeTokenService;

impl SessionTokenService for FakeTokenService {
    fn issue_token(&self, subject: &str, display_name: &str) -> AppResult<String> {
        Ok(format!("token:{subject}:{display_name}"))
    }

    fn verify_token(&self, token: &str) -> AppResult<SessionClaims> {
        let mut parts = token.splitn(3, ':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some("token"), Some(subject), Some(display_name)) => {
                let issued_at = Utc::now();
                Ok(SessionClaims {
                    subject: subject.to_owned(),
                    display_name: display_name.to_owned(),
                    issued_at,
                    expires_at: issued_at + SESSION_TOKEN_TTL,
                })
            }
            _ => Err(AppError::Unauthorized("Invalid token".to_owned())),
        }
    }
}

pub(crate) struct Harness {
    pub(crate) store: Arc<FakeEntityStore>,
    pub(crate) audit: Arc<FakeAuditRepository>,
    pub(crate) recorder: AuditRecorder,
}

impl Harness {
    pub(crate) fn new() -> Self {
        Self::with(FakeEntityStore::default(), AuditMode::Accept)
    }

    pub(crate) fn with(store: FakeEntityStore, mode: AuditMode) -> Self {
        let audit = Arc::new(FakeAuditRepository::with_mode(mode));
        let recorder = AuditRecorder::new(audit.clone()).with_write_timeout(Duration::from_millis(50));
        Self {
            store: Arc::new(store),
            audit,
            recorder,
        }
    }

    pub(crate) async fn seed_user(&self, username: &str) -> User {
        let user = User::new(UserId::new(), "Seeded", username, "hashed:password123")
            .unwrap_or_else(|error| panic!("seed user should be valid: {error}"));
        self.store.users.lock().await.insert(user.id(), user.clone());
        user
    }

    pub(crate) async fn seed_position(&self, name: &str) -> Position {
        let position = Position::new(PositionId::new(), name)
            .unwrap_or_else(|error| panic!("seed position should be valid: {error}"));
        self.store
            .positions
            .lock()
            .await
            .insert(position.id(), position.clone());
        position
    }

    pub(crate) async fn audit_records(&self) -> Vec<AuditRecord> {
        self.audit.records.lock().await.clone()
    }
}
