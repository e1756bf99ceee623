use std::sync::Arc;

use inkwell_core::{AppError, AppResult, UserIdentity};
use inkwell_domain::{Permission, User, UserId};
use tracing::warn;

use crate::UserRepository;

/// Application service for capability checks against the signed-in account.
#[derive(Clone)]
pub struct AuthorizationService {
    user_repository: Arc<dyn UserRepository>,
}

impl AuthorizationService {
    /// Creates a new authorization service from a repository implementation.
    #[must_use]
    pub fn new(user_repository: Arc<dyn UserRepository>) -> Self {
        Self { user_repository }
    }

    /// Loads the account behind an authenticated identity with its current role.
    pub async fn current_user(&self, identity: &UserIdentity) -> AppResult<User> {
        self.user_repository
            .find_by_id(UserId::from_uuid(identity.user_id()))
            .await?
            .map(|account| account.user)
            .ok_or_else(|| AppError::Unauthorized("account no longer exists".to_owned()))
    }

    /// Returns whether the identity's account holds `permission`.
    pub async fn can(&self, identity: &UserIdentity, permission: Permission) -> AppResult<bool> {
        Ok(self.current_user(identity).await?.can(permission))
    }

    /// Returns whether the identity's account is an administrator.
    pub async fn is_administrator(&self, identity: &UserIdentity) -> AppResult<bool> {
        Ok(self.current_user(identity).await?.is_administrator())
    }

    /// Loads the current account and fails unless it holds `permission`.
    pub async fn require(
        &self,
        identity: &UserIdentity,
        permission: Permission,
    ) -> AppResult<User> {
        let user = self.current_user(identity).await?;
        require_permission(&user, permission)?;
        Ok(user)
    }
}

/// Fails with [`AppError::Forbidden`] unless `user` holds `permission`.
pub fn require_permission(user: &User, permission: Permission) -> AppResult<()> {
    if user.can(permission) {
        return Ok(());
    }

    warn!(
        user_id = %user.id,
        permission = permission.as_str(),
        "permission denied"
    );
    Err(AppError::Forbidden(format!(
        "user '{}' lacks permission '{}'",
        user.username,
        permission.as_str()
    )))
}
