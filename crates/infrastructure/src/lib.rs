//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod argon2_password_hasher;
mod in_memory_audit_record_repository;
mod in_memory_entity_store;
mod jwt_session_token_service;
mod postgres_audit_record_repository;
mod postgres_errors;
mod postgres_position_repository;
mod postgres_task_repository;
mod postgres_user_position_repository;
mod postgres_user_repository;

pub use argon2_password_hasher::Argon2PasswordHasher;
pub use in_memory_audit_record_repository::InMemoryAuditRecordRepository;
pub use in_memory_entity_store::InMemoryEntityStore;
pub use jwt_session_token_service::JwtSessionTokenService;
pub use postgres_audit_record_repository::PostgresAuditRecordRepository;
pub use postgres_position_repository::PostgresPositionRepository;
pub use postgres_task_repository::PostgresTaskRepository;
pub use postgres_user_position_repository::PostgresUserPositionRepository;
pub use postgres_user_repository::PostgresUserRepository;
