use tasktrail_application::{
    AuthService, PositionService, TaskService, UserPositionService, UserService,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub task_service: TaskService,
    pub position_service: PositionService,
    pub user_position_service: UserPositionService,
    pub auth_service: AuthService,
}
