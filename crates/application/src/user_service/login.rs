use inkwell_domain::EmailAddress;
use tracing::info;

use super::*;

impl UserService {
    /// Authenticates with email and password.
    ///
    /// Returns `None` for any failure. A hash is computed even when the
    /// account does not exist.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<Option<User>> {
        let Ok(email_address) = EmailAddress::new(email) else {
            let _ = self.password_hasher.hash_password(password);
            return Ok(None);
        };

        let Some(account) = self
            .user_repository
            .find_by_email(email_address.as_str())
            .await?
        else {
            let _ = self.password_hasher.hash_password(password);
            return Ok(None);
        };

        if !self
            .password_hasher
            .verify_password(password, account.password_hash.as_str())?
        {
            info!(user_id = %account.user.id, "login rejected");
            return Ok(None);
        }

        self.user_repository
            .touch_last_seen(account.user.id)
            .await?;

        Ok(Some(account.user))
    }
}
