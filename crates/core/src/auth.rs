use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User information persisted in the authenticated session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    user_id: Uuid,
    username: String,
    email: String,
}

impl UserIdentity {
    /// Creates a user identity from a stored account.
    #[must_use]
    pub fn new(user_id: Uuid, username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            user_id,
            username: username.into(),
            email: email.into(),
        }
    }

    /// Returns the stable account identifier.
    #[must_use]
    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    /// Returns the public username.
    #[must_use]
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Returns the canonical email address.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.as_str()
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::UserIdentity;

    #[test]
    fn identity_exposes_constructor_values() {
        let user_id = Uuid::new_v4();
        let identity = UserIdentity::new(user_id, "ada", "ada@example.com");

        assert_eq!(identity.user_id(), user_id);
        assert_eq!(identity.username(), "ada");
        assert_eq!(identity.email(), "ada@example.com");
    }
}
