use serde::{Deserialize, Serialize};
use tasktrail_application::CreateUserInput;

use super::UserResponse;

/// Incoming payload for self-registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub username: String,
    pub password: String,
}

impl From<RegisterRequest> for CreateUserInput {
    fn from(request: RegisterRequest) -> Self {
        Self {
            name: request.name,
            username: request.username,
            password: request.password,
        }
    }
}

/// Registration result.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user: UserResponse,
}

/// Incoming payload for password login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login result carrying the bearer token.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserResponse,
}
