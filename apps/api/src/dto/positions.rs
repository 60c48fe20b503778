use serde::{Deserialize, Serialize};
use tasktrail_domain::Position;

/// Incoming payload for position creation.
#[derive(Debug, Deserialize)]
pub struct CreatePositionRequest {
    pub name: String,
}

/// Incoming payload for a position rename.
#[derive(Debug, Default, Deserialize)]
pub struct UpdatePositionRequest {
    pub name: Option<String>,
}

/// API representation of a position.
#[derive(Debug, Serialize)]
pub struct PositionResponse {
    pub id: String,
    pub name: String,
}

impl From<Position> for PositionResponse {
    fn from(position: Position) -> Self {
        Self {
            id: position.id().to_string(),
            name: position.name().to_owned(),
        }
    }
}
