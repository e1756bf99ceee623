use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use inkwell_core::UserIdentity;
use inkwell_domain::{JobId, UserId};

use crate::dto::{LaunchTaskRequest, TaskProgressResponse, TaskResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_tasks_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<TaskResponse>>> {
    let tasks = state
        .task_service
        .get_tasks_in_progress(UserId::from_uuid(identity.user_id()))
        .await?
        .into_iter()
        .map(TaskResponse::from)
        .collect();

    Ok(Json(tasks))
}

pub async fn launch_task_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Json(payload): Json<LaunchTaskRequest>,
) -> ApiResult<(StatusCode, Json<TaskResponse>)> {
    let user_id = UserId::from_uuid(identity.user_id());
    let task = state
        .task_service
        .launch_task(
            user_id,
            payload.name.as_str(),
            payload.description.as_str(),
            &payload.args,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(TaskResponse::from(task))))
}

pub async fn task_progress_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Path(task_id): Path<String>,
) -> ApiResult<Json<TaskProgressResponse>> {
    let job_id = JobId::new(task_id)?;
    let task = state
        .task_service
        .find_task(UserId::from_uuid(identity.user_id()), &job_id)
        .await?;
    let progress = state.task_service.get_progress(&task).await;

    Ok(Json(TaskProgressResponse::new(&task, progress)))
}
