//! User management ports and application service.
//!
//! Owns account lifecycle operations: registration with role assignment,
//! password login and API bearer tokens. Login failures never reveal whether
//! the account exists.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use inkwell_core::AppResult;
use inkwell_domain::{EmailAddress, User, UserId};

use crate::RoleRepository;

mod login;
mod registration;
mod tokens;

pub use tokens::DEFAULT_TOKEN_LIFETIME_SECONDS;

// ---------------------------------------------------------------------------
// Ports
// ---------------------------------------------------------------------------

/// Stored account: the user plus its credential.
#[derive(Debug, Clone)]
pub struct UserAccount {
    /// Account as seen by capability checks.
    pub user: User,
    /// Argon2id password hash.
    pub password_hash: String,
}

/// Values persisted when an account is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUserInput {
    /// Canonical email address.
    pub email: String,
    /// Public username.
    pub username: String,
    /// Argon2id password hash.
    pub password_hash: String,
    /// Name of the role to link, if any.
    pub role_name: Option<String>,
}

/// Account resolved from an API token, with the token expiry.
#[derive(Debug, Clone)]
pub struct TokenOwner {
    /// Token owner.
    pub user: User,
    /// Instant after which the token is rejected.
    pub expires_at: DateTime<Utc>,
}

/// Repository port for user persistence.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds an account by canonical email.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserAccount>>;

    /// Finds an account by its identifier.
    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserAccount>>;

    /// Creates an account. Duplicate email or username is a conflict.
    async fn create(&self, input: CreateUserInput) -> AppResult<User>;

    /// Records authenticated activity.
    async fn touch_last_seen(&self, user_id: UserId) -> AppResult<()>;

    /// Replaces the stored API token hash and expiry.
    async fn store_token(
        &self,
        user_id: UserId,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<()>;

    /// Moves the API token expiry without changing the hash.
    async fn expire_token(&self, user_id: UserId, expires_at: DateTime<Utc>) -> AppResult<()>;

    /// Finds the owner of an API token hash.
    async fn find_by_token_hash(&self, token_hash: &str) -> AppResult<Option<TokenOwner>>;
}

/// Port for password hashing operations.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password.
    fn hash_password(&self, password: &str) -> AppResult<String>;

    /// Verifies a plaintext password against a stored hash.
    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool>;
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Parameters for user registration.
#[derive(Debug, Clone)]
pub struct RegisterParams {
    /// Email address for the new account.
    pub email: String,
    /// Public username.
    pub username: String,
    /// Plaintext password.
    pub password: String,
}

/// Freshly issued API token. Only its hash is stored.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// Raw token handed to the client once.
    pub token: String,
    /// Expiry instant.
    pub expires_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Application service for registration, login and API tokens.
#[derive(Clone)]
pub struct UserService {
    user_repository: Arc<dyn UserRepository>,
    role_repository: Arc<dyn RoleRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    administrator_email: Option<EmailAddress>,
}

impl UserService {
    /// Creates a new user service.
    ///
    /// Accounts registered with `administrator_email` receive the
    /// administrator role.
    #[must_use]
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        role_repository: Arc<dyn RoleRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
        administrator_email: Option<EmailAddress>,
    ) -> Self {
        Self {
            user_repository,
            role_repository,
            password_hasher,
            administrator_email,
        }
    }

    /// Returns a user by ID, if it exists.
    pub async fn find_user(&self, user_id: UserId) -> AppResult<Option<User>> {
        Ok(self
            .user_repository
            .find_by_id(user_id)
            .await?
            .map(|account| account.user))
    }
}

#[cfg(test)]
mod tests;
