use inkwell_core::AppError;
use inkwell_domain::{
    ADMINISTRATOR_ROLE_NAME, EmailAddress, Role, validate_password, validate_username,
};
use tracing::{info, warn};

use super::*;

impl UserService {
    /// Registers a new account and assigns its initial role.
    ///
    /// The configured administrator email receives the administrator role,
    /// everyone else the default role. Before roles are seeded the account
    /// is created without a role.
    pub async fn register(&self, params: RegisterParams) -> AppResult<User> {
        let email_address = EmailAddress::new(&params.email)?;
        let username = validate_username(params.username)?;
        validate_password(&params.password)?;

        if self
            .user_repository
            .find_by_email(email_address.as_str())
            .await?
            .is_some()
        {
            // Keep the response time close to a successful registration.
            let _ = self.password_hasher.hash_password(&params.password);
            return Err(AppError::Conflict(
                "an account with this email already exists".to_owned(),
            ));
        }

        let password_hash = self.password_hasher.hash_password(&params.password)?;
        let role = self.initial_role(&email_address).await?;
        if role.is_none() {
            warn!(
                email = %email_address.as_str(),
                "no default role found, registering account without a role"
            );
        }

        let user = self
            .user_repository
            .create(CreateUserInput {
                email: email_address.into(),
                username: username.into(),
                password_hash,
                role_name: role.as_ref().map(|role| role.name().to_owned()),
            })
            .await?;

        info!(
            user_id = %user.id,
            role = user.role.as_ref().map(Role::name).unwrap_or("none"),
            "user registered"
        );

        Ok(user)
    }

    async fn initial_role(&self, email: &EmailAddress) -> AppResult<Option<Role>> {
        if self.administrator_email.as_ref() == Some(email)
            && let Some(role) = self
                .role_repository
                .find_role(ADMINISTRATOR_ROLE_NAME)
                .await?
        {
            return Ok(Some(role));
        }

        self.role_repository.find_default_role().await
    }
}
