use chrono::{DateTime, SecondsFormat, Utc};
use inkwell_domain::{Permission, Role, User};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for account registration.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/register-request.ts"
)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
}

/// Incoming payload for password login.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/login-request.ts"
)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Incoming payload for API token issuance.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/token-request.ts"
)]
pub struct TokenRequest {
    #[serde(default)]
    pub expires_in: Option<i64>,
}

/// Freshly issued API token.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/token-response.ts"
)]
pub struct TokenResponse {
    pub token: String,
    pub expires_at: String,
}

impl TokenResponse {
    pub fn new(token: String, expires_at: DateTime<Utc>) -> Self {
        Self {
            token,
            expires_at: expires_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}

/// API representation of an account and its capabilities.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/user-response.ts"
)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub username: String,
    pub role: Option<String>,
    pub permissions: Vec<String>,
    pub is_administrator: bool,
    pub last_seen: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        let permissions = user
            .role
            .as_ref()
            .map(|role| role.permissions().permissions())
            .unwrap_or_default()
            .into_iter()
            .map(|permission: Permission| permission.as_str().to_owned())
            .collect();

        Self {
            id: user.id.to_string(),
            is_administrator: user.is_administrator(),
            role: user.role.as_ref().map(Role::name).map(str::to_owned),
            permissions,
            last_seen: user.last_seen.to_rfc3339_opts(SecondsFormat::Secs, true),
            email: user.email,
            username: user.username,
        }
    }
}
