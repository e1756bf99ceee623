//! PostgreSQL-backed user repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use inkwell_application::{CreateUserInput, TokenOwner, UserAccount, UserRepository};
use inkwell_core::{AppError, AppResult};
use inkwell_domain::{PermissionSet, Role, User, UserId};

/// PostgreSQL implementation of the user repository port.
#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Columns selected by every account lookup.
const ACCOUNT_COLUMNS: &str = r#"
    users.id,
    users.email,
    users.username,
    users.password_hash,
    users.last_seen,
    users.token_expires_at,
    roles.name AS role_name,
    roles.permissions AS role_permissions,
    roles.is_default AS role_is_default
"#;

#[derive(Debug, sqlx::FromRow)]
struct AccountRow {
    id: uuid::Uuid,
    email: String,
    username: String,
    password_hash: String,
    last_seen: DateTime<Utc>,
    token_expires_at: Option<DateTime<Utc>>,
    role_name: Option<String>,
    role_permissions: Option<i32>,
    role_is_default: Option<bool>,
}

impl AccountRow {
    fn into_account(self) -> AppResult<UserAccount> {
        let role = match (self.role_name, self.role_permissions) {
            (Some(name), Some(permissions)) => Some(Role::from_parts(
                name,
                PermissionSet::from_storage(permissions)?,
                self.role_is_default.unwrap_or(false),
            )?),
            _ => None,
        };

        Ok(UserAccount {
            user: User {
                id: UserId::from_uuid(self.id),
                email: self.email,
                username: self.username,
                role,
                last_seen: self.last_seen,
            },
            password_hash: self.password_hash,
        })
    }
}

mod account;
mod lookup;
mod tokens;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserAccount>> {
        self.find_by_email_impl(email).await
    }

    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserAccount>> {
        self.find_by_id_impl(user_id).await
    }

    async fn create(&self, input: CreateUserInput) -> AppResult<User> {
        self.create_impl(input).await
    }

    async fn touch_last_seen(&self, user_id: UserId) -> AppResult<()> {
        self.touch_last_seen_impl(user_id).await
    }

    async fn store_token(
        &self,
        user_id: UserId,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<()> {
        self.store_token_impl(user_id, token_hash, expires_at).await
    }

    async fn expire_token(&self, user_id: UserId, expires_at: DateTime<Utc>) -> AppResult<()> {
        self.expire_token_impl(user_id, expires_at).await
    }

    async fn find_by_token_hash(&self, token_hash: &str) -> AppResult<Option<TokenOwner>> {
        self.find_by_token_hash_impl(token_hash).await
    }
}

fn account_conflict_or_internal(error: sqlx::Error, operation: &str) -> AppError {
    if let sqlx::Error::Database(ref database_error) = error
        && database_error.code().as_deref() == Some("23505")
    {
        return AppError::Conflict(
            "an account with this email or username already exists".to_owned(),
        );
    }

    AppError::Internal(format!("failed to {operation}: {error}"))
}
