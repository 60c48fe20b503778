use serde::Serialize;
use tracing::{debug, warn};

use tasktrail_core::{ActorIdentity, AppResult};
use tasktrail_domain::{AuditAction, EntityKind, Snapshot};

use crate::AuditRecorder;

/// Caller-side guard around the recorder used by every mutation service.
///
/// Runs only after the entity store write has committed. Anonymous mutations
/// are skipped; recorder failures are logged and never returned.
#[derive(Clone)]
pub(crate) struct AuditTrail {
    recorder: AuditRecorder,
}

impl AuditTrail {
    pub(crate) fn new(recorder: AuditRecorder) -> Self {
        Self { recorder }
    }

    pub(crate) async fn created<T: Serialize + ?Sized>(
        &self,
        actor: Option<&ActorIdentity>,
        entity: EntityKind,
        entity_id: &str,
        state: &T,
    ) {
        let Some(actor_id) = attributed_actor(actor, AuditAction::Create, entity, entity_id) else {
            return;
        };

        let result = match Snapshot::capture(state) {
            Ok(after) => {
                self.recorder
                    .record_create(actor_id, entity.as_str(), entity_id, after)
                    .await
            }
            Err(error) => Err(error),
        };
        contain(result, AuditAction::Create, entity, entity_id);
    }

    pub(crate) async fn updated<T: Serialize + ?Sized>(
        &self,
        actor: Option<&ActorIdentity>,
        entity: EntityKind,
        entity_id: &str,
        before: Snapshot,
        state: &T,
    ) {
        let Some(actor_id) = attributed_actor(actor, AuditAction::Update, entity, entity_id) else {
            return;
        };

        let result = match Snapshot::capture(state) {
            Ok(after) => {
                self.recorder
                    .record_update(actor_id, entity.as_str(), entity_id, before, after)
                    .await
            }
            Err(error) => Err(error),
        };
        contain(result, AuditAction::Update, entity, entity_id);
    }

    pub(crate) async fn deleted(
        &self,
        actor: Option<&ActorIdentity>,
        entity: EntityKind,
        entity_id: &str,
        before: Snapshot,
    ) {
        let Some(actor_id) = attributed_actor(actor, AuditAction::Delete, entity, entity_id) else {
            return;
        };

        let result = self
            .recorder
            .record_delete(actor_id, entity.as_str(), entity_id, before)
            .await;
        contain(result, AuditAction::Delete, entity, entity_id);
    }
}

fn attributed_actor<'a>(
    actor: Option<&'a ActorIdentity>,
    action: AuditAction,
    entity: EntityKind,
    entity_id: &str,
) -> Option<&'a str> {
    let actor_id = actor
        .map(ActorIdentity::subject)
        .filter(|subject| !subject.trim().is_empty());

    if actor_id.is_none() {
        debug!(
            action = %action,
            entity = entity.as_str(),
            entity_id,
            "no authenticated actor; audit record skipped"
        );
    }

    actor_id
}

fn contain(result: AppResult<()>, action: AuditAction, entity: EntityKind, entity_id: &str) {
    if let Err(error) = result {
        warn!(
            error = %error,
            action = %action,
            entity = entity.as_str(),
            entity_id,
            "audit record write failed after entity mutation committed"
        );
    }
}
