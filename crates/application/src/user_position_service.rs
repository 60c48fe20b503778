use std::collections::HashMap;
use std::sync::Arc;

use tasktrail_core::{ActorIdentity, AppError, AppResult};
use tasktrail_domain::{
    EntityKind, Position, PositionId, Snapshot, User, UserId, UserPosition, UserPositionDetails,
    UserPositionId,
};

use crate::audit_trail::AuditTrail;
use crate::{AuditRecorder, PositionRepository, UserPositionRepository, UserRepository};

/// Application service for user-position assignments.
#[derive(Clone)]
pub struct UserPositionService {
    user_position_repository: Arc<dyn UserPositionRepository>,
    user_repository: Arc<dyn UserRepository>,
    position_repository: Arc<dyn PositionRepository>,
    audit_trail: AuditTrail,
}

impl UserPositionService {
    /// Creates a new assignment service.
    #[must_use]
    pub fn new(
        user_position_repository: Arc<dyn UserPositionRepository>,
        user_repository: Arc<dyn UserRepository>,
        position_repository: Arc<dyn PositionRepository>,
        audit_recorder: AuditRecorder,
    ) -> Self {
        Self {
            user_position_repository,
            user_repository,
            position_repository,
            audit_trail: AuditTrail::new(audit_recorder),
        }
    }

    /// Lists all assignments with their user and position.
    pub async fn list_user_positions(&self) -> AppResult<Vec<UserPositionDetails>> {
        let user_positions = self.user_position_repository.list_user_positions().await?;
        let users: HashMap<UserId, User> = self
            .user_repository
            .list_users()
            .await?
            .into_iter()
            .map(|user| (user.id(), user))
            .collect();
        let positions: HashMap<PositionId, Position> = self
            .position_repository
            .list_positions()
            .await?
            .into_iter()
            .map(|position| (position.id(), position))
            .collect();

        Ok(user_positions
            .into_iter()
            .map(|user_position| {
                UserPositionDetails::new(
                    user_position,
                    users.get(&user_position.user_id()).cloned(),
                    positions.get(&user_position.position_id()).cloned(),
                )
            })
            .collect())
    }

    /// Assigns an existing user to an existing position.
    ///
    /// Both references are checked before the store is touched; a missing
    /// reference is a validation error and a repeated pair is a conflict.
    pub async fn create_user_position(
        &self,
        actor: Option<&ActorIdentity>,
        user_id: UserId,
        position_id: PositionId,
    ) -> AppResult<UserPositionDetails> {
        let user = self
            .user_repository
            .find_user(user_id)
            .await?
            .ok_or_else(|| AppError::Validation("User not found".to_owned()))?;
        let position = self
            .position_repository
            .find_position(position_id)
            .await?
            .ok_or_else(|| AppError::Validation("Position not found".to_owned()))?;

        if self
            .user_position_repository
            .find_assignment(user_id, position_id)
            .await?
            .is_some()
        {
            return Err(already_assigned());
        }

        let user_position = UserPosition::new(UserPositionId::new(), user_id, position_id);
        let inserted = self
            .user_position_repository
            .insert_user_position(&user_position)
            .await
            .map_err(|error| match error {
                AppError::Conflict(_) => already_assigned(),
                other => other,
            })?;
        let created = UserPositionDetails::new(inserted, Some(user), Some(position));

        self.audit_trail
            .created(
                actor,
                EntityKind::UserPositions,
                &inserted.id().to_string(),
                &created,
            )
            .await;

        Ok(created)
    }

    /// Removes an assignment.
    pub async fn delete_user_position(
        &self,
        actor: Option<&ActorIdentity>,
        user_position_id: UserPositionId,
    ) -> AppResult<()> {
        let user_position = self
            .user_position_repository
            .find_user_position(user_position_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User position not found".to_owned()))?;
        let user = self
            .user_repository
            .find_user(user_position.user_id())
            .await?;
        let position = self
            .position_repository
            .find_position(user_position.position_id())
            .await?;
        let before = Snapshot::capture(&UserPositionDetails::new(user_position, user, position))?;

        self.user_position_repository
            .delete_user_position(user_position_id)
            .await?;

        self.audit_trail
            .deleted(
                actor,
                EntityKind::UserPositions,
                &user_position_id.to_string(),
                before,
            )
            .await;

        Ok(())
    }
}

fn already_assigned() -> AppError {
    AppError::Conflict("User is already assigned to this position".to_owned())
}
