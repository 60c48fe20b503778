use std::sync::Arc;
use std::time::Duration;

use tasktrail_application::{
    AuditRecordRepository, AuditRecorder, AuthService, PasswordHasher, PositionRepository,
    PositionService, SessionTokenService, TaskRepository, TaskService, UserPositionRepository,
    UserPositionService, UserRepository, UserService,
};
use tasktrail_infrastructure::{
    Argon2PasswordHasher, JwtSessionTokenService, PostgresAuditRecordRepository,
    PostgresPositionRepository, PostgresTaskRepository, PostgresUserPositionRepository,
    PostgresUserRepository,
};

use crate::api_config::ApiConfig;
use crate::state::AppState;

use super::DatabasePools;

/// Adapters the services are wired from.
pub struct StatePorts {
    pub user_repository: Arc<dyn UserRepository>,
    pub task_repository: Arc<dyn TaskRepository>,
    pub position_repository: Arc<dyn PositionRepository>,
    pub user_position_repository: Arc<dyn UserPositionRepository>,
    pub audit_repository: Arc<dyn AuditRecordRepository>,
    pub password_hasher: Arc<dyn PasswordHasher>,
    pub token_service: Arc<dyn SessionTokenService>,
}

pub fn build_app_state(pools: &DatabasePools, config: &ApiConfig) -> AppState {
    let ports = StatePorts {
        user_repository: Arc::new(PostgresUserRepository::new(pools.entity_pool.clone())),
        task_repository: Arc::new(PostgresTaskRepository::new(pools.entity_pool.clone())),
        position_repository: Arc::new(PostgresPositionRepository::new(pools.entity_pool.clone())),
        user_position_repository: Arc::new(PostgresUserPositionRepository::new(
            pools.entity_pool.clone(),
        )),
        audit_repository: Arc::new(PostgresAuditRecordRepository::new(pools.audit_pool.clone())),
        password_hasher: Arc::new(Argon2PasswordHasher::new()),
        token_service: Arc::new(JwtSessionTokenService::new(config.jwt_secret.as_bytes())),
    };

    assemble_app_state(ports, config.audit_write_timeout)
}

pub fn assemble_app_state(ports: StatePorts, audit_write_timeout: Duration) -> AppState {
    let audit_recorder =
        AuditRecorder::new(ports.audit_repository).with_write_timeout(audit_write_timeout);

    let user_service = UserService::new(
        ports.user_repository.clone(),
        ports.password_hasher.clone(),
        audit_recorder.clone(),
    );

    AppState {
        auth_service: AuthService::new(
            user_service.clone(),
            ports.password_hasher,
            ports.token_service,
        ),
        task_service: TaskService::new(
            ports.task_repository,
            ports.user_repository.clone(),
            audit_recorder.clone(),
        ),
        position_service: PositionService::new(
            ports.position_repository.clone(),
            audit_recorder.clone(),
        ),
        user_position_service: UserPositionService::new(
            ports.user_position_repository,
            ports.user_repository,
            ports.position_repository,
            audit_recorder,
        ),
        user_service,
    }
}
