use std::sync::Arc;

use async_trait::async_trait;
use inkwell_core::AppResult;
use inkwell_domain::{DEFAULT_ROLE_NAME, ROLE_CATALOG, Role};
use tracing::info;

/// Repository port for role persistence.
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Lists every role ordered by name.
    async fn list_roles(&self) -> AppResult<Vec<Role>>;

    /// Finds one role by its unique name.
    async fn find_role(&self, name: &str) -> AppResult<Option<Role>>;

    /// Returns the role new accounts receive, if one is marked default.
    async fn find_default_role(&self) -> AppResult<Option<Role>>;

    /// Upserts roles by name in one transaction.
    ///
    /// When one of the saved roles is the default, every other stored role
    /// loses the default flag.
    async fn save_roles(&self, roles: &[Role]) -> AppResult<Vec<Role>>;
}

/// Application service owning the role registry.
#[derive(Clone)]
pub struct RoleService {
    repository: Arc<dyn RoleRepository>,
}

impl RoleService {
    /// Creates a role service from a repository implementation.
    #[must_use]
    pub fn new(repository: Arc<dyn RoleRepository>) -> Self {
        Self { repository }
    }

    /// Creates or refreshes the built-in roles.
    ///
    /// Safe to run repeatedly: every role ends with exactly the permissions
    /// listed in the catalog, whatever it held before.
    pub async fn insert_roles(&self) -> AppResult<Vec<Role>> {
        let existing = self.repository.list_roles().await?;

        let mut roles = Vec::with_capacity(ROLE_CATALOG.len());
        for seed in ROLE_CATALOG {
            let mut role = match existing.iter().find(|role| role.name() == seed.name) {
                Some(role) => role.clone(),
                None => Role::new(seed.name)?,
            };
            role.apply_seed(seed, DEFAULT_ROLE_NAME);
            roles.push(role);
        }

        let saved = self.repository.save_roles(&roles).await?;
        info!(role_count = saved.len(), default_role = DEFAULT_ROLE_NAME, "roles seeded");

        Ok(saved)
    }

    /// Lists every role.
    pub async fn list_roles(&self) -> AppResult<Vec<Role>> {
        self.repository.list_roles().await
    }
}

#[cfg(test)]
mod tests;
