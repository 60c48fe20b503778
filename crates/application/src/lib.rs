//! Application services and ports.

#![forbid(unsafe_code)]

mod audit_ports;
mod audit_recorder;
mod audit_trail;
mod auth_service;
mod credential_ports;
mod entity_ports;
mod position_service;
mod task_service;
mod user_position_service;
mod user_service;

#[cfg(test)]
mod test_support;

pub use audit_ports::AuditRecordRepository;
pub use audit_recorder::{AuditRecorder, DEFAULT_AUDIT_WRITE_TIMEOUT};
pub use auth_service::{AuthService, LoginOutcome};
pub use credential_ports::{
    PasswordHasher, SESSION_TOKEN_TTL, SessionClaims, SessionTokenService,
};
pub use entity_ports::{PositionRepository, TaskRepository, UserPositionRepository, UserRepository};
pub use position_service::PositionService;
pub use task_service::{CreateTaskInput, TaskService, UpdateTaskInput};
pub use user_position_service::UserPositionService;
pub use user_service::{CreateUserInput, UpdateUserInput, UserService};
