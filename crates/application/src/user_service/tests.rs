use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use inkwell_core::{AppError, AppResult};
use inkwell_domain::{
    DEFAULT_ROLE_NAME, EmailAddress, Permission, ROLE_CATALOG, Role, User, UserId,
};
use tokio::sync::Mutex;

use crate::RoleRepository;

use super::{
    CreateUserInput, PasswordHasher, RegisterParams, TokenOwner, UserAccount, UserRepository,
    UserService,
};

#[derive(Default)]
struct FakeRoleRepository {
    roles: Vec<Role>,
}

impl FakeRoleRepository {
    fn seeded() -> Self {
        let roles = ROLE_CATALOG
            .iter()
            .map(|seed| {
                let mut role = Role::new(seed.name).unwrap_or_else(|_| unreachable!());
                role.apply_seed(seed, DEFAULT_ROLE_NAME);
                role
            })
            .collect();
        Self { roles }
    }
}

#[async_trait]
impl RoleRepository for FakeRoleRepository {
    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        Ok(self.roles.clone())
    }

    async fn find_role(&self, name: &str) -> AppResult<Option<Role>> {
        Ok(self.roles.iter().find(|role| role.name() == name).cloned())
    }

    async fn find_default_role(&self) -> AppResult<Option<Role>> {
        Ok(self.roles.iter().find(|role| role.is_default()).cloned())
    }

    async fn save_roles(&self, roles: &[Role]) -> AppResult<Vec<Role>> {
        Ok(roles.to_vec())
    }
}

struct StoredAccount {
    account: UserAccount,
    token_hash: Option<String>,
    token_expires_at: Option<DateTime<Utc>>,
}

#[derive(Default)]
struct FakeUserRepository {
    accounts: Mutex<Vec<StoredAccount>>,
    roles: Vec<Role>,
}

#[async_trait]
impl UserRepository for FakeUserRepository {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserAccount>> {
        Ok(self
            .accounts
            .lock()
            .await
            .iter()
            .find(|stored| stored.account.user.email == email)
            .map(|stored| stored.account.clone()))
    }

    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserAccount>> {
        Ok(self
            .accounts
            .lock()
            .await
            .iter()
            .find(|stored| stored.account.user.id == user_id)
            .map(|stored| stored.account.clone()))
    }

    async fn create(&self, input: CreateUserInput) -> AppResult<User> {
        let mut accounts = self.accounts.lock().await;
        if accounts
            .iter()
            .any(|stored| stored.account.user.username == input.username)
        {
            return Err(AppError::Conflict("username is taken".to_owned()));
        }

        let role = input
            .role_name
            .as_deref()
            .and_then(|name| self.roles.iter().find(|role| role.name() == name).cloned());
        let user = User {
            id: UserId::new(),
            email: input.email,
            username: input.username,
            role,
            last_seen: Utc::now(),
        };

        accounts.push(StoredAccount {
            account: UserAccount {
                user: user.clone(),
                password_hash: input.password_hash,
            },
            token_hash: None,
            token_expires_at: None,
        });

        Ok(user)
    }

    async fn touch_last_seen(&self, user_id: UserId) -> AppResult<()> {
        let mut accounts = self.accounts.lock().await;
        if let Some(stored) = accounts
            .iter_mut()
            .find(|stored| stored.account.user.id == user_id)
        {
            stored.account.user.last_seen = Utc::now();
        }
        Ok(())
    }

    async fn store_token(
        &self,
        user_id: UserId,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<()> {
        let mut accounts = self.accounts.lock().await;
        let stored = accounts
            .iter_mut()
            .find(|stored| stored.account.user.id == user_id)
            .ok_or_else(|| AppError::NotFound("user not found".to_owned()))?;
        stored.token_hash = Some(token_hash.to_owned());
        stored.token_expires_at = Some(expires_at);
        Ok(())
    }

    async fn expire_token(&self, user_id: UserId, expires_at: DateTime<Utc>) -> AppResult<()> {
        let mut accounts = self.accounts.lock().await;
        if let Some(stored) = accounts
            .iter_mut()
            .find(|stored| stored.account.user.id == user_id)
        {
            stored.token_expires_at = Some(expires_at);
        }
        Ok(())
    }

    async fn find_by_token_hash(&self, token_hash: &str) -> AppResult<Option<TokenOwner>> {
        Ok(self.accounts.lock().await.iter().find_map(|stored| {
            match (&stored.token_hash, stored.token_expires_at) {
                (Some(hash), Some(expires_at)) if hash == token_hash => Some(TokenOwner {
                    user: stored.account.user.clone(),
                    expires_at,
                }),
                _ => None,
            }
        }))
    }
}

struct PlainTextHasher;

impl PasswordHasher for PlainTextHasher {
    fn hash_password(&self, password: &str) -> AppResult<String> {
        Ok(format!("hashed:{password}"))
    }

    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        Ok(hash == format!("hashed:{password}"))
    }
}

fn build_service(
    role_repository: FakeRoleRepository,
    administrator_email: Option<&str>,
) -> (Arc<FakeUserRepository>, UserService) {
    let user_repository = Arc::new(FakeUserRepository {
        accounts: Mutex::new(Vec::new()),
        roles: role_repository.roles.clone(),
    });
    let administrator_email = administrator_email
        .map(|email| EmailAddress::new(email).unwrap_or_else(|_| unreachable!()));
    let service = UserService::new(
        user_repository.clone(),
        Arc::new(role_repository),
        Arc::new(PlainTextHasher),
        administrator_email,
    );
    (user_repository, service)
}

fn params(email: &str, username: &str) -> RegisterParams {
    RegisterParams {
        email: email.to_owned(),
        username: username.to_owned(),
        password: "correct horse battery".to_owned(),
    }
}

#[tokio::test]
async fn register_assigns_default_role() {
    let (_, service) = build_service(FakeRoleRepository::seeded(), None);

    let user = service.register(params("reader@example.com", "reader")).await;
    assert!(user.is_ok());

    let user = user.unwrap_or_else(|_| unreachable!());
    assert!(matches!(&user.role, Some(role) if role.name() == "User"));
    assert!(user.can(Permission::Comment));
    assert!(!user.can(Permission::Write));
    assert!(!user.is_administrator());
}

#[tokio::test]
async fn register_promotes_configured_administrator_email() {
    let (_, service) = build_service(FakeRoleRepository::seeded(), Some("Owner@Example.com"));

    let user = service.register(params("owner@example.com", "owner")).await;
    assert!(matches!(&user, Ok(user) if user.is_administrator()));
}

#[tokio::test]
async fn register_before_seeding_leaves_user_without_permissions() {
    let (_, service) = build_service(FakeRoleRepository::default(), None);

    let user = service.register(params("early@example.com", "early")).await;
    assert!(matches!(&user, Ok(user) if user.role.is_none()));
    assert!(matches!(&user, Ok(user) if !user.can(Permission::Follow)));
}

#[tokio::test]
async fn register_rejects_duplicate_email() {
    let (_, service) = build_service(FakeRoleRepository::seeded(), None);

    assert!(service.register(params("dup@example.com", "first")).await.is_ok());
    let duplicate = service.register(params("DUP@example.com", "second")).await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn login_accepts_correct_password_only() {
    let (_, service) = build_service(FakeRoleRepository::seeded(), None);
    assert!(service.register(params("login@example.com", "login")).await.is_ok());

    let accepted = service
        .login("login@example.com", "correct horse battery")
        .await;
    assert!(matches!(accepted, Ok(Some(user)) if user.username == "login"));

    let wrong_password = service.login("login@example.com", "wrong password").await;
    assert!(matches!(wrong_password, Ok(None)));

    let unknown = service
        .login("nobody@example.com", "correct horse battery")
        .await;
    assert!(matches!(unknown, Ok(None)));

    let malformed = service.login("not-an-email", "correct horse battery").await;
    assert!(matches!(malformed, Ok(None)));
}

#[tokio::test]
async fn issued_token_resolves_until_revoked() {
    let (_, service) = build_service(FakeRoleRepository::seeded(), None);
    let user = service
        .register(params("token@example.com", "token"))
        .await
        .unwrap_or_else(|_| unreachable!());

    let issued = service
        .get_token(user.id, 3600)
        .await
        .unwrap_or_else(|_| unreachable!());
    let owner = service.check_token(issued.token.as_str()).await;
    assert!(matches!(owner, Ok(Some(owner)) if owner.id == user.id));

    assert!(service.revoke_token(user.id).await.is_ok());
    let revoked = service.check_token(issued.token.as_str()).await;
    assert!(matches!(revoked, Ok(None)));
}

#[tokio::test]
async fn reissuing_token_invalidates_previous_one() {
    let (repository, service) = build_service(FakeRoleRepository::seeded(), None);
    let user = service
        .register(params("rotate@example.com", "rotate"))
        .await
        .unwrap_or_else(|_| unreachable!());

    let first = service
        .get_token(user.id, 60)
        .await
        .unwrap_or_else(|_| unreachable!());
    let second = service
        .get_token(user.id, 60)
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_ne!(first.token, second.token);
    assert!(matches!(service.check_token(first.token.as_str()).await, Ok(None)));
    assert!(matches!(
        service.check_token(second.token.as_str()).await,
        Ok(Some(_))
    ));

    let stored_hash = repository
        .accounts
        .lock()
        .await
        .first()
        .and_then(|stored| stored.token_hash.clone());
    assert!(matches!(stored_hash, Some(hash) if hash != second.token));
}

#[tokio::test]
async fn token_lifetime_must_be_positive() {
    let (_, service) = build_service(FakeRoleRepository::seeded(), None);

    let result = service.get_token(UserId::new(), 0).await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn blank_token_resolves_to_nobody() {
    let (_, service) = build_service(FakeRoleRepository::seeded(), None);

    assert!(matches!(service.check_token("  ").await, Ok(None)));
}
