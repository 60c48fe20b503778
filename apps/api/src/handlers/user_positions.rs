use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use tasktrail_core::ActorIdentity;
use tasktrail_domain::{PositionId, UserId, UserPositionId};

use crate::dto::{CreateUserPositionRequest, DataResponse, MessageResponse, UserPositionResponse};
use crate::error::{ApiJson, ApiResult};
use crate::state::AppState;

pub async fn list_user_positions_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<DataResponse<Vec<UserPositionResponse>>>> {
    let user_positions = state
        .user_position_service
        .list_user_positions()
        .await?
        .into_iter()
        .map(UserPositionResponse::from)
        .collect();

    Ok(Json(DataResponse::new(user_positions)))
}

pub async fn create_user_position_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorIdentity>,
    ApiJson(payload): ApiJson<CreateUserPositionRequest>,
) -> ApiResult<(StatusCode, Json<DataResponse<UserPositionResponse>>)> {
    let user_id = UserId::parse(&payload.user_id)?;
    let position_id = PositionId::parse(&payload.position_id)?;
    let user_position = state
        .user_position_service
        .create_user_position(Some(&actor), user_id, position_id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse::new(UserPositionResponse::from(user_position))),
    ))
}

pub async fn delete_user_position_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorIdentity>,
    Path(user_position_id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let user_position_id = UserPositionId::parse(&user_position_id)?;
    state
        .user_position_service
        .delete_user_position(Some(&actor), user_position_id)
        .await?;

    Ok(Json(MessageResponse::deleted("User position")))
}
