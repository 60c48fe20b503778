use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use tasktrail_core::ActorIdentity;
use tasktrail_domain::PositionId;

use crate::dto::{
    CreatePositionRequest, DataResponse, MessageResponse, PositionResponse, UpdatePositionRequest,
};
use crate::error::{ApiJson, ApiResult};
use crate::state::AppState;

pub async fn list_positions_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<DataResponse<Vec<PositionResponse>>>> {
    let positions = state
        .position_service
        .list_positions()
        .await?
        .into_iter()
        .map(PositionResponse::from)
        .collect();

    Ok(Json(DataResponse::new(positions)))
}

pub async fn create_position_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorIdentity>,
    ApiJson(payload): ApiJson<CreatePositionRequest>,
) -> ApiResult<(StatusCode, Json<DataResponse<PositionResponse>>)> {
    let position = state
        .position_service
        .create_position(Some(&actor), payload.name)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse::new(PositionResponse::from(position))),
    ))
}

pub async fn update_position_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorIdentity>,
    Path(position_id): Path<String>,
    ApiJson(payload): ApiJson<UpdatePositionRequest>,
) -> ApiResult<Json<DataResponse<PositionResponse>>> {
    let position_id = PositionId::parse(&position_id)?;
    let position = state
        .position_service
        .update_position(Some(&actor), position_id, payload.name)
        .await?;

    Ok(Json(DataResponse::new(PositionResponse::from(position))))
}

pub async fn delete_position_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorIdentity>,
    Path(position_id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let position_id = PositionId::parse(&position_id)?;
    state
        .position_service
        .delete_position(Some(&actor), position_id)
        .await?;

    Ok(Json(MessageResponse::deleted("Position")))
}
