use chrono::SecondsFormat;
use inkwell_core::AppResult;
use inkwell_domain::{Notification, Task, TaskProgress};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

/// Incoming payload for launching a background task.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/launch-task-request.ts"
)]
pub struct LaunchTaskRequest {
    pub name: String,
    pub description: String,
    #[serde(default)]
    #[ts(type = "unknown")]
    pub args: Value,
}

/// API representation of a task.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/task-response.ts"
)]
pub struct TaskResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub complete: bool,
    pub created_at: String,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id.to_string(),
            name: task.name,
            description: task.description,
            complete: task.complete,
            created_at: task.created_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}

/// Progress of one task, 0 to 100.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/task-progress-response.ts"
)]
pub struct TaskProgressResponse {
    pub id: String,
    pub progress: u8,
}

impl TaskProgressResponse {
    pub fn new(task: &Task, progress: TaskProgress) -> Self {
        Self {
            id: task.id.to_string(),
            progress: progress.percent(),
        }
    }
}

/// Query string for the notification feed.
#[derive(Debug, Default, Deserialize)]
pub struct NotificationQuery {
    #[serde(default)]
    pub since: f64,
}

/// API representation of a notification.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/notification-response.ts"
)]
pub struct NotificationResponse {
    pub id: i64,
    pub name: String,
    pub timestamp: f64,
    #[ts(type = "unknown")]
    pub data: Value,
}

impl NotificationResponse {
    pub fn try_from_notification(notification: Notification) -> AppResult<Self> {
        let data = notification.get_data()?;

        Ok(Self {
            id: notification.id,
            name: notification.name,
            timestamp: notification.timestamp,
            data,
        })
    }
}
