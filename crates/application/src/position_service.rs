use std::sync::Arc;

use tasktrail_core::{ActorIdentity, AppError, AppResult, NonEmptyString};
use tasktrail_domain::{EntityKind, Position, PositionId, Snapshot};

use crate::audit_trail::AuditTrail;
use crate::{AuditRecorder, PositionRepository};

/// Application service for positions.
#[derive(Clone)]
pub struct PositionService {
    position_repository: Arc<dyn PositionRepository>,
    audit_trail: AuditTrail,
}

impl PositionService {
    /// Creates a new position service.
    #[must_use]
    pub fn new(position_repository: Arc<dyn PositionRepository>, audit_recorder: AuditRecorder) -> Self {
        Self {
            position_repository,
            audit_trail: AuditTrail::new(audit_recorder),
        }
    }

    /// Lists all positions.
    pub async fn list_positions(&self) -> AppResult<Vec<Position>> {
        self.position_repository.list_positions().await
    }

    /// Creates a position with a unique name.
    pub async fn create_position(
        &self,
        actor: Option<&ActorIdentity>,
        name: String,
    ) -> AppResult<Position> {
        let position = Position::new(PositionId::new(), name)?;
        let created = self.position_repository.insert_position(&position).await?;

        self.audit_trail
            .created(
                actor,
                EntityKind::Positions,
                &created.id().to_string(),
                &created,
            )
            .await;

        Ok(created)
    }

    /// Renames a position. `None` leaves the name unchanged but still records the update.
    pub async fn update_position(
        &self,
        actor: Option<&ActorIdentity>,
        position_id: PositionId,
        name: Option<String>,
    ) -> AppResult<Position> {
        let mut position = self.require_position(position_id).await?;
        let before = Snapshot::capture(&position)?;

        if let Some(name) = name {
            position.rename(NonEmptyString::for_field("name", name)?);
        }
        let updated = self.position_repository.update_position(&position).await?;

        self.audit_trail
            .updated(
                actor,
                EntityKind::Positions,
                &updated.id().to_string(),
                before,
                &updated,
            )
            .await;

        Ok(updated)
    }

    /// Deletes a position.
    pub async fn delete_position(
        &self,
        actor: Option<&ActorIdentity>,
        position_id: PositionId,
    ) -> AppResult<()> {
        let position = self.require_position(position_id).await?;
        let before = Snapshot::capture(&position)?;

        self.position_repository.delete_position(position_id).await?;

        self.audit_trail
            .deleted(
                actor,
                EntityKind::Positions,
                &position_id.to_string(),
                before,
            )
            .await;

        Ok(())
    }

    async fn require_position(&self, position_id: PositionId) -> AppResult<Position> {
        self.position_repository
            .find_position(position_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Position not found".to_owned()))
    }
}

#[cfg(test)]
mod tests;
