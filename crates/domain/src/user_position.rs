use serde::Serialize;

use crate::ids::entity_id;
use crate::{Position, PositionId, User, UserId};

entity_id!(
    /// Unique identifier for a user-position assignment.
    UserPositionId,
    "user position"
);

/// Assignment of one user to one position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UserPosition {
    id: UserPositionId,
    user_id: UserId,
    position_id: PositionId,
}

impl UserPosition {
    /// Creates an assignment.
    #[must_use]
    pub fn new(id: UserPositionId, user_id: UserId, position_id: PositionId) -> Self {
        Self {
            id,
            user_id,
            position_id,
        }
    }

    /// Returns the assignment identifier.
    #[must_use]
    pub fn id(&self) -> UserPositionId {
        self.id
    }

    /// Returns the assigned user.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the assigned position.
    #[must_use]
    pub fn position_id(&self) -> PositionId {
        self.position_id
    }
}

/// Assignment with the referenced user and position embedded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserPositionDetails {
    #[serde(flatten)]
    user_position: UserPosition,
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<User>,
    #[serde(skip_serializing_if = "Option::is_none")]
    position: Option<Position>,
}

impl UserPositionDetails {
    /// Pairs an assignment with whichever of its references could be loaded.
    #[must_use]
    pub fn new(
        user_position: UserPosition,
        user: Option<User>,
        position: Option<Position>,
    ) -> Self {
        Self {
            user_position,
            user,
            position,
        }
    }

    /// Returns the assignment.
    #[must_use]
    pub fn user_position(&self) -> &UserPosition {
        &self.user_position
    }

    /// Returns the assigned user.
    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Returns the assigned position.
    #[must_use]
    pub fn position(&self) -> Option<&Position> {
        self.position.as_ref()
    }
}
