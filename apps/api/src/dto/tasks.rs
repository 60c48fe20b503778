use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tasktrail_domain::TaskDetails;

use super::UserResponse;

/// Incoming payload for task creation.
#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub user_id: String,
    pub todo: String,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

/// Incoming payload for a partial task update.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTaskRequest {
    pub user_id: Option<String>,
    pub todo: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

/// API representation of a task with its owner.
#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub id: String,
    pub user_id: String,
    pub todo: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserResponse>,
}

impl From<TaskDetails> for TaskResponse {
    fn from(details: TaskDetails) -> Self {
        // Same rendering chrono's serde uses, so responses match audit snapshots.
        let rfc3339 = |value: DateTime<Utc>| value.to_rfc3339_opts(SecondsFormat::AutoSi, true);
        let task = details.task();

        Self {
            id: task.id().to_string(),
            user_id: task.user_id().to_string(),
            todo: task.todo().to_owned(),
            start_date: task.start_date().map(rfc3339),
            end_date: task.end_date().map(rfc3339),
            user: details.user().cloned().map(UserResponse::from),
        }
    }
}
