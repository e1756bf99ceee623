use axum::Json;
use axum::extract::{Extension, Query, State};
use inkwell_core::{AppResult, UserIdentity};
use inkwell_domain::UserId;

use crate::dto::{NotificationQuery, NotificationResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_notifications_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Query(query): Query<NotificationQuery>,
) -> ApiResult<Json<Vec<NotificationResponse>>> {
    let notifications = state
        .notification_service
        .list_since(UserId::from_uuid(identity.user_id()), query.since)
        .await?
        .into_iter()
        .map(NotificationResponse::try_from_notification)
        .collect::<AppResult<Vec<_>>>()?;

    Ok(Json(notifications))
}
