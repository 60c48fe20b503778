mod auth;
mod common;
mod positions;
mod tasks;
mod user_positions;
mod users;

pub use auth::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
pub use common::{DataResponse, HealthResponse, MessageResponse};
pub use positions::{CreatePositionRequest, PositionResponse, UpdatePositionRequest};
pub use tasks::{CreateTaskRequest, TaskResponse, UpdateTaskRequest};
pub use user_positions::{CreateUserPositionRequest, UserPositionResponse};
pub use users::{CreateUserRequest, UpdateUserRequest, UserResponse};
