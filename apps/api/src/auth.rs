//! Public credential endpoints. Neither produces an audit record.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::dto::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, UserResponse};
use crate::error::{ApiJson, ApiResult};
use crate::state::AppState;

pub async fn register_handler(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<RegisterResponse>)> {
    let user = state.auth_service.register(payload.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user: UserResponse::from(user),
        }),
    ))
}

pub async fn login_handler(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let outcome = state
        .auth_service
        .login(&payload.username, &payload.password)
        .await?;

    Ok(Json(LoginResponse {
        token: outcome.token,
        user: UserResponse::from(outcome.user),
    }))
}
