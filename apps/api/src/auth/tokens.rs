use axum::Json;
use axum::body::Bytes;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use inkwell_application::DEFAULT_TOKEN_LIFETIME_SECONDS;
use inkwell_core::{AppError, UserIdentity};
use inkwell_domain::UserId;

use crate::dto::{TokenRequest, TokenResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn issue_token_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<TokenResponse>)> {
    let expires_in = parse_token_request(&body)?
        .expires_in
        .unwrap_or(DEFAULT_TOKEN_LIFETIME_SECONDS);

    let issued = state
        .user_service
        .get_token(UserId::from_uuid(identity.user_id()), expires_in)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(TokenResponse::new(issued.token, issued.expires_at)),
    ))
}

pub async fn revoke_token_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
) -> ApiResult<StatusCode> {
    state
        .user_service
        .revoke_token(UserId::from_uuid(identity.user_id()))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// An empty body asks for the default lifetime.
fn parse_token_request(body: &[u8]) -> Result<TokenRequest, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(TokenRequest::default());
    }

    serde_json::from_slice(body)
        .map_err(|error| AppError::Validation(format!("invalid token request: {error}")))
}

#[cfg(test)]
mod tests {
    use inkwell_core::AppError;

    use super::parse_token_request;

    #[test]
    fn empty_body_uses_default_lifetime() {
        for body in [&b""[..], &b"  \n"[..]] {
            let parsed = parse_token_request(body);
            assert!(matches!(parsed, Ok(request) if request.expires_in.is_none()));
        }
    }

    #[test]
    fn explicit_lifetime_is_read() {
        let parsed = parse_token_request(br#"{"expires_in": 600}"#);
        assert!(matches!(parsed, Ok(request) if request.expires_in == Some(600)));
    }

    #[test]
    fn malformed_body_is_a_validation_error() {
        assert!(matches!(
            parse_token_request(b"{expires_in"),
            Err(AppError::Validation(_))
        ));
    }
}
