use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use inkwell_application::RegisterParams;
use inkwell_core::{AppError, UserIdentity};
use tower_sessions::Session;
use tracing::info;

use crate::dto::{LoginRequest, RegisterRequest, UserResponse};
use crate::error::ApiResult;
use crate::state::AppState;

use super::{SESSION_USER_KEY, identity_for};

pub async fn register_handler(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    let user = state
        .user_service
        .register(RegisterParams {
            email: payload.email,
            username: payload.username,
            password: payload.password,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

pub async fn login_handler(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<UserResponse>> {
    let user = state
        .user_service
        .login(&payload.email, &payload.password)
        .await?
        .ok_or_else(|| AppError::Unauthorized("invalid email or password".to_owned()))?;

    session.cycle_id().await.map_err(|error| {
        AppError::Internal(format!("failed to rotate session id: {error}"))
    })?;
    session
        .insert(SESSION_USER_KEY, identity_for(&user))
        .await
        .map_err(|error| AppError::Internal(format!("failed to persist session: {error}")))?;

    info!(user_id = %user.id, "user logged in");
    Ok(Json(UserResponse::from(user)))
}

pub async fn logout_handler(session: Session) -> ApiResult<StatusCode> {
    session
        .delete()
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete session: {error}")))?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn me_handler(
    State(state): State<AppState>,
    session: Session,
) -> ApiResult<Json<UserResponse>> {
    let identity = session
        .get::<UserIdentity>(SESSION_USER_KEY)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read session identity: {error}")))?
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;

    let user = state.authorization_service.current_user(&identity).await?;
    Ok(Json(UserResponse::from(user)))
}
