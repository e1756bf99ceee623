use inkwell_core::UserIdentity;
use inkwell_domain::User;

mod session;
mod tokens;

pub use session::{login_handler, logout_handler, me_handler, register_handler};
pub use tokens::{issue_token_handler, revoke_token_handler};

pub const SESSION_USER_KEY: &str = "user_identity";

/// Builds the session identity stored for an authenticated account.
pub fn identity_for(user: &User) -> UserIdentity {
    UserIdentity::new(
        user.id.as_uuid(),
        user.username.as_str(),
        user.email.as_str(),
    )
}
