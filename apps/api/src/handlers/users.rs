use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use tasktrail_core::ActorIdentity;
use tasktrail_domain::UserId;

use crate::dto::{CreateUserRequest, DataResponse, MessageResponse, UpdateUserRequest, UserResponse};
use crate::error::{ApiJson, ApiResult};
use crate::state::AppState;

pub async fn list_users_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<DataResponse<Vec<UserResponse>>>> {
    let users = state
        .user_service
        .list_users()
        .await?
        .into_iter()
        .map(UserResponse::from)
        .collect();

    Ok(Json(DataResponse::new(users)))
}

pub async fn create_user_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorIdentity>,
    ApiJson(payload): ApiJson<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<DataResponse<UserResponse>>)> {
    let user = state
        .user_service
        .create_user(Some(&actor), payload.into())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse::new(UserResponse::from(user))),
    ))
}

pub async fn update_user_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorIdentity>,
    Path(user_id): Path<String>,
    ApiJson(payload): ApiJson<UpdateUserRequest>,
) -> ApiResult<Json<DataResponse<UserResponse>>> {
    let user_id = UserId::parse(&user_id)?;
    let user = state
        .user_service
        .update_user(Some(&actor), user_id, payload.into())
        .await?;

    Ok(Json(DataResponse::new(UserResponse::from(user))))
}

pub async fn delete_user_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorIdentity>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let user_id = UserId::parse(&user_id)?;
    state.user_service.delete_user(Some(&actor), user_id).await?;

    Ok(Json(MessageResponse::deleted("User")))
}
