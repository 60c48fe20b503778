use serde::Serialize;
use tasktrail_core::{AppResult, NonEmptyString};

use crate::ids::entity_id;

entity_id!(
    /// Unique identifier for a position record.
    PositionId,
    "position"
);

/// Named position users can be assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Position {
    id: PositionId,
    name: NonEmptyString,
}

impl Position {
    /// Creates a position with a validated name.
    pub fn new(id: PositionId, name: impl Into<String>) -> AppResult<Self> {
        Ok(Self {
            id,
            name: NonEmptyString::for_field("name", name)?,
        })
    }

    /// Returns the position identifier.
    #[must_use]
    pub fn id(&self) -> PositionId {
        self.id
    }

    /// Returns the unique position name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Renames the position.
    pub fn rename(&mut self, name: NonEmptyString) {
        self.name = name;
    }
}
