use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use tasktrail_application::{CreateTaskInput, UpdateTaskInput};
use tasktrail_core::ActorIdentity;
use tasktrail_domain::{TaskId, UserId};

use crate::dto::{CreateTaskRequest, DataResponse, MessageResponse, TaskResponse, UpdateTaskRequest};
use crate::error::{ApiJson, ApiResult};
use crate::state::AppState;

pub async fn list_tasks_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<DataResponse<Vec<TaskResponse>>>> {
    let tasks = state
        .task_service
        .list_tasks()
        .await?
        .into_iter()
        .map(TaskResponse::from)
        .collect();

    Ok(Json(DataResponse::new(tasks)))
}

pub async fn create_task_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorIdentity>,
    ApiJson(payload): ApiJson<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<DataResponse<TaskResponse>>)> {
    let input = CreateTaskInput {
        user_id: UserId::parse(&payload.user_id)?,
        todo: payload.todo,
        start_date: payload.start_date,
        end_date: payload.end_date,
    };
    let task = state.task_service.create_task(Some(&actor), input).await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse::new(TaskResponse::from(task))),
    ))
}

pub async fn update_task_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorIdentity>,
    Path(task_id): Path<String>,
    ApiJson(payload): ApiJson<UpdateTaskRequest>,
) -> ApiResult<Json<DataResponse<TaskResponse>>> {
    let task_id = TaskId::parse(&task_id)?;
    let input = UpdateTaskInput {
        user_id: payload
            .user_id
            .as_deref()
            .map(UserId::parse)
            .transpose()?,
        todo: payload.todo,
        start_date: payload.start_date,
        end_date: payload.end_date,
    };
    let task = state
        .task_service
        .update_task(Some(&actor), task_id, input)
        .await?;

    Ok(Json(DataResponse::new(TaskResponse::from(task))))
}

pub async fn delete_task_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorIdentity>,
    Path(task_id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let task_id = TaskId::parse(&task_id)?;
    state.task_service.delete_task(Some(&actor), task_id).await?;

    Ok(Json(MessageResponse::deleted("Task")))
}
