//! Audit trail data model and its persisted wire contract.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tasktrail_core::AppError;
use uuid::Uuid;

use crate::Snapshot;

/// Mutation verbs recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    /// An entity was created.
    Create,
    /// An entity was changed in place.
    Update,
    /// An entity was removed.
    Delete,
}

impl AuditAction {
    /// Returns the stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
        }
    }
}

impl Display for AuditAction {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for AuditAction {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "CREATE" => Ok(Self::Create),
            "UPDATE" => Ok(Self::Update),
            "DELETE" => Ok(Self::Delete),
            _ => Err(AppError::Validation(format!(
                "unknown audit action '{value}'"
            ))),
        }
    }
}

/// Logical collections produced by the mutation services.
///
/// The recorder itself accepts any entity label; these are the ones the
/// services emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// `users` collection.
    Users,
    /// `tasks` collection.
    Tasks,
    /// `positions` collection.
    Positions,
    /// `user_positions` collection.
    UserPositions,
}

impl EntityKind {
    /// Returns the audit label for this collection.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Tasks => "tasks",
            Self::Positions => "positions",
            Self::UserPositions => "user_positions",
        }
    }
}

/// One mutation with the snapshots its verb requires.
///
/// CREATE carries only the resulting state, DELETE only the prior state and
/// UPDATE both.
#[derive(Debug, Clone, PartialEq)]
pub enum AuditChange {
    /// Entity was created with `after` as its first state.
    Create {
        /// State after creation.
        after: Snapshot,
    },
    /// Entity moved from `before` to `after`.
    Update {
        /// State prior to the update.
        before: Snapshot,
        /// State after the update.
        after: Snapshot,
    },
    /// Entity was removed while in state `before`.
    Delete {
        /// State prior to removal.
        before: Snapshot,
    },
}

impl AuditChange {
    /// Returns the verb this change records.
    #[must_use]
    pub fn action(&self) -> AuditAction {
        match self {
            Self::Create { .. } => AuditAction::Create,
            Self::Update { .. } => AuditAction::Update,
            Self::Delete { .. } => AuditAction::Delete,
        }
    }

    /// Splits the change into its persisted before/after pair.
    #[must_use]
    pub fn into_meta(self) -> AuditMeta {
        match self {
            Self::Create { after } => AuditMeta {
                before: None,
                after: Some(after),
            },
            Self::Update { before, after } => AuditMeta {
                before: Some(before),
                after: Some(after),
            },
            Self::Delete { before } => AuditMeta {
                before: Some(before),
                after: None,
            },
        }
    }
}

/// Persisted before/after pair. Absent sides are omitted from the wire form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    before: Option<Snapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    after: Option<Snapshot>,
}

impl AuditMeta {
    /// Returns the prior state, absent for CREATE.
    #[must_use]
    pub fn before(&self) -> Option<&Snapshot> {
        self.before.as_ref()
    }

    /// Returns the resulting state, absent for DELETE.
    #[must_use]
    pub fn after(&self) -> Option<&Snapshot> {
        self.after.as_ref()
    }
}

/// Store-generated identifier of a persisted audit record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuditRecordId(Uuid);

impl AuditRecordId {
    /// Wraps a store-generated UUID.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Display for AuditRecordId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Audit record assembled by the recorder, before the store assigns its id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAuditRecord {
    user_id: String,
    action: AuditAction,
    entity: String,
    entity_id: String,
    timestamp: DateTime<Utc>,
    meta: AuditMeta,
}

impl NewAuditRecord {
    /// Assembles a record for one change attributed to `user_id`.
    #[must_use]
    pub fn new(
        user_id: impl Into<String>,
        entity: impl Into<String>,
        entity_id: impl Into<String>,
        change: AuditChange,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            action: change.action(),
            entity: entity.into(),
            entity_id: entity_id.into(),
            timestamp,
            meta: change.into_meta(),
        }
    }

    /// Returns the actor identifier.
    #[must_use]
    pub fn user_id(&self) -> &str {
        self.user_id.as_str()
    }

    /// Returns the recorded verb.
    #[must_use]
    pub fn action(&self) -> AuditAction {
        self.action
    }

    /// Returns the entity collection label.
    #[must_use]
    pub fn entity(&self) -> &str {
        self.entity.as_str()
    }

    /// Returns the affected entity identifier.
    #[must_use]
    pub fn entity_id(&self) -> &str {
        self.entity_id.as_str()
    }

    /// Returns the recorder-assigned timestamp.
    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Returns the before/after pair.
    #[must_use]
    pub fn meta(&self) -> &AuditMeta {
        &self.meta
    }

    /// Finalizes the record with the identifier assigned by the store.
    #[must_use]
    pub fn into_record(self, id: AuditRecordId) -> AuditRecord {
        AuditRecord {
            id,
            user_id: self.user_id,
            action: self.action,
            entity: self.entity,
            entity_id: self.entity_id,
            timestamp: self.timestamp,
            meta: self.meta,
        }
    }
}

/// Immutable, persisted audit record.
///
/// Serializes to `{ id, user_id, action, entity, entity_id, timestamp, meta: { before?, after? } }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditRecord {
    id: AuditRecordId,
    user_id: String,
    action: AuditAction,
    entity: String,
    entity_id: String,
    timestamp: DateTime<Utc>,
    meta: AuditMeta,
}

impl AuditRecord {
    /// Returns the store-generated identifier.
    #[must_use]
    pub fn id(&self) -> AuditRecordId {
        self.id
    }

    /// Returns the actor identifier.
    #[must_use]
    pub fn user_id(&self) -> &str {
        self.user_id.as_str()
    }

    /// Returns the recorded verb.
    #[must_use]
    pub fn action(&self) -> AuditAction {
        self.action
    }

    /// Returns the entity collection label.
    #[must_use]
    pub fn entity(&self) -> &str {
        self.entity.as_str()
    }

    /// Returns the affected entity identifier.
    #[must_use]
    pub fn entity_id(&self) -> &str {
        self.entity_id.as_str()
    }

    /// Returns the recorder-assigned timestamp.
    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Returns the before/after pair.
    #[must_use]
    pub fn meta(&self) -> &AuditMeta {
        &self.meta
    }
}
