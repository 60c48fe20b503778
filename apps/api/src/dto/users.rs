use serde::{Deserialize, Serialize};
use tasktrail_application::{CreateUserInput, UpdateUserInput};
use tasktrail_domain::User;

/// Incoming payload for user creation.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub username: String,
    pub password: String,
}

impl From<CreateUserRequest> for CreateUserInput {
    fn from(request: CreateUserRequest) -> Self {
        Self {
            name: request.name,
            username: request.username,
            password: request.password,
        }
    }
}

/// Incoming payload for a partial user update.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl From<UpdateUserRequest> for UpdateUserInput {
    fn from(request: UpdateUserRequest) -> Self {
        Self {
            name: request.name,
            username: request.username,
            password: request.password,
        }
    }
}

/// API representation of a user. `password` is always empty.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub username: String,
    pub password: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id().to_string(),
            name: user.name().to_owned(),
            username: user.username().to_owned(),
            password: String::new(),
        }
    }
}
