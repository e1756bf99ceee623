use chrono::Duration;
use inkwell_core::AppError;
use tracing::info;

use super::*;

/// Lifetime of an API token when the caller does not pick one.
pub const DEFAULT_TOKEN_LIFETIME_SECONDS: i64 = 3600;

impl UserService {
    /// Issues a new API token valid for `expires_in_seconds`.
    ///
    /// Any previously issued token stops working.
    pub async fn get_token(
        &self,
        user_id: UserId,
        expires_in_seconds: i64,
    ) -> AppResult<IssuedToken> {
        if expires_in_seconds <= 0 {
            return Err(AppError::Validation(
                "token lifetime must be greater than zero".to_owned(),
            ));
        }

        let (token, token_hash) = generate_token()?;
        let expires_at = Utc::now() + Duration::seconds(expires_in_seconds);

        self.user_repository
            .store_token(user_id, token_hash.as_str(), expires_at)
            .await?;

        info!(user_id = %user_id, %expires_at, "api token issued");
        Ok(IssuedToken { token, expires_at })
    }

    /// Expires the current API token immediately.
    pub async fn revoke_token(&self, user_id: UserId) -> AppResult<()> {
        self.user_repository
            .expire_token(user_id, Utc::now() - Duration::seconds(1))
            .await
    }

    /// Resolves the owner of a raw API token, if it is known and not expired.
    pub async fn check_token(&self, token: &str) -> AppResult<Option<User>> {
        if token.trim().is_empty() {
            return Ok(None);
        }

        let owner = self
            .user_repository
            .find_by_token_hash(hash_token(token).as_str())
            .await?;

        Ok(owner
            .filter(|owner| owner.expires_at > Utc::now())
            .map(|owner| owner.user))
    }
}

/// Generates a random token and its SHA-256 hash.
///
/// Returns `(raw_token_hex, sha256_hash_hex)`.
fn generate_token() -> AppResult<(String, String)> {
    let mut bytes = [0u8; 24];
    getrandom::fill(&mut bytes)
        .map_err(|error| AppError::Internal(format!("failed to generate api token: {error}")))?;

    let raw_token = to_hex(&bytes);
    let hash = hash_token(&raw_token);
    Ok((raw_token, hash))
}

/// Computes the SHA-256 hash of a token string for storage.
fn hash_token(raw_token: &str) -> String {
    use sha2::{Digest, Sha256};

    let mut hasher = Sha256::new();
    hasher.update(raw_token.as_bytes());
    to_hex(&hasher.finalize())
}

fn to_hex(bytes: &[u8]) -> String {
    use std::fmt::Write;

    bytes
        .iter()
        .fold(String::with_capacity(bytes.len() * 2), |mut acc, byte| {
            let _ = write!(acc, "{byte:02x}");
            acc
        })
}
