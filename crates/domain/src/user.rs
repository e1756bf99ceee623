//! Account types, capability checks and credential rules.

use chrono::{DateTime, Utc};
use inkwell_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Permission, PermissionSet, Role};

/// Unique identifier for a user record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(Uuid);

impl UserId {
    /// Creates a new random user identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a user identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Validated, lower-cased email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Creates a validated email address.
    ///
    /// Only structural checks are made: one `@`, non-empty local part and a
    /// domain containing a `.`.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim().to_lowercase();

        if trimmed.is_empty() {
            return Err(AppError::Validation(
                "email address must not be empty".to_owned(),
            ));
        }

        let Some((local, domain)) = trimmed.split_once('@') else {
            return Err(AppError::Validation(
                "email address must contain exactly one '@'".to_owned(),
            ));
        };

        if local.is_empty() {
            return Err(AppError::Validation(
                "email local part must not be empty".to_owned(),
            ));
        }

        if domain.contains('@') {
            return Err(AppError::Validation(
                "email address must contain exactly one '@'".to_owned(),
            ));
        }

        if domain.is_empty() || !domain.contains('.') {
            return Err(AppError::Validation(
                "email domain must contain at least one '.'".to_owned(),
            ));
        }

        if trimmed.len() > EMAIL_MAX_LENGTH {
            return Err(AppError::Validation(format!(
                "email address must not exceed {EMAIL_MAX_LENGTH} characters"
            )));
        }

        Ok(Self(trimmed))
    }

    /// Returns the validated email string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

/// Maximum stored email length.
pub const EMAIL_MAX_LENGTH: usize = 64;

/// Maximum username length.
pub const USERNAME_MAX_LENGTH: usize = 64;

/// Minimum accepted password length.
pub const PASSWORD_MIN_LENGTH: usize = 8;

/// Maximum accepted password length (bounds Argon2 work per request).
pub const PASSWORD_MAX_LENGTH: usize = 128;

/// Validated public username.
pub type Username = NonEmptyString;

/// Validates a username.
pub fn validate_username(value: impl Into<String>) -> AppResult<Username> {
    let username = NonEmptyString::with_max_chars("username", value, USERNAME_MAX_LENGTH)?;
    if username.as_str().chars().any(char::is_whitespace) {
        return Err(AppError::Validation(
            "username must not contain whitespace".to_owned(),
        ));
    }

    Ok(username)
}

/// Validates a plaintext password before it is hashed.
pub fn validate_password(password: &str) -> AppResult<()> {
    let char_count = password.chars().count();

    if char_count < PASSWORD_MIN_LENGTH {
        return Err(AppError::Validation(format!(
            "password must be at least {PASSWORD_MIN_LENGTH} characters"
        )));
    }

    if char_count > PASSWORD_MAX_LENGTH {
        return Err(AppError::Validation(format!(
            "password must not exceed {PASSWORD_MAX_LENGTH} characters"
        )));
    }

    let lowered = password.to_lowercase();
    if COMMON_PASSWORDS.iter().any(|entry| *entry == lowered) {
        return Err(AppError::Validation(
            "this password is too common".to_owned(),
        ));
    }

    Ok(())
}

static COMMON_PASSWORDS: &[&str] = &[
    "password",
    "12345678",
    "123456789",
    "1234567890",
    "qwertyuiop",
    "password1",
    "password123",
    "iloveyou",
    "sunshine",
    "football",
    "baseball",
    "trustno1",
    "letmein1",
    "starwars",
    "whatever",
];

/// A registered account as seen by capability checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Unique identifier.
    pub id: UserId,
    /// Canonical email address.
    pub email: String,
    /// Public username.
    pub username: String,
    /// Assigned role, absent until roles are seeded and assigned.
    pub role: Option<Role>,
    /// Last authenticated activity.
    pub last_seen: DateTime<Utc>,
}

impl User {
    /// Returns whether the user's role grants every bit of `permission`.
    ///
    /// Users without a role hold no permissions.
    #[must_use]
    pub fn can(&self, permission: impl Into<PermissionSet>) -> bool {
        self.role
            .as_ref()
            .is_some_and(|role| role.has_permission(permission))
    }

    /// Returns whether the user holds the administrator permission.
    #[must_use]
    pub fn is_administrator(&self) -> bool {
        self.can(Permission::Admin)
    }
}
