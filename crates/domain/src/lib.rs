//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod audit;
mod ids;
mod position;
mod snapshot;
mod task;
mod user;
mod user_position;

pub use audit::{
    AuditAction, AuditChange, AuditMeta, AuditRecord, AuditRecordId, EntityKind, NewAuditRecord,
};
pub use position::{Position, PositionId};
pub use snapshot::{SENSITIVE_FIELDS, Snapshot};
pub use task::{Task, TaskDetails, TaskId, TaskPatch};
pub use user::{
    PASSWORD_MAX_LENGTH, PASSWORD_MIN_LENGTH, User, UserId, UserPatch, validate_password,
};
pub use user_position::{UserPosition, UserPositionDetails, UserPositionId};
