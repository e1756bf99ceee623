use axum::extract::{Request, State};
use axum::http::{HeaderMap, header};
use axum::middleware::Next;
use axum::response::Response;
use inkwell_core::{AppError, UserIdentity};
use tower_sessions::Session;
use tracing::debug;

use crate::auth::{SESSION_USER_KEY, identity_for};
use crate::error::ApiResult;
use crate::state::AppState;

/// Resolves the caller from a bearer token or the session cookie.
///
/// A bearer header that does not resolve is rejected even when a session
/// is present.
pub async fn require_auth(
    State(state): State<AppState>,
    session: Session,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let identity = match bearer_token(request.headers()) {
        Some(token) => {
            let user = state
                .user_service
                .check_token(token)
                .await?
                .ok_or_else(|| AppError::Unauthorized("invalid or expired token".to_owned()))?;
            debug!(user_id = %user.id, "request authenticated with api token");
            identity_for(&user)
        }
        None => session
            .get::<UserIdentity>(SESSION_USER_KEY)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to read session identity: {error}"))
            })?
            .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?,
    };

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
}
