use serde::{Deserialize, Serialize};
use tasktrail_domain::UserPositionDetails;

use super::{PositionResponse, UserResponse};

/// Incoming payload for assigning a user to a position.
#[derive(Debug, Deserialize)]
pub struct CreateUserPositionRequest {
    pub user_id: String,
    pub position_id: String,
}

/// API representation of a user-position assignment with both references.
#[derive(Debug, Serialize)]
pub struct UserPositionResponse {
    pub id: String,
    pub user_id: String,
    pub position_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<PositionResponse>,
}

impl From<UserPositionDetails> for UserPositionResponse {
    fn from(details: UserPositionDetails) -> Self {
        let user_position = details.user_position();

        Self {
            id: user_position.id().to_string(),
            user_id: user_position.user_id().to_string(),
            position_id: user_position.position_id().to_string(),
            user: details.user().cloned().map(UserResponse::from),
            position: details.position().cloned().map(PositionResponse::from),
        }
    }
}
