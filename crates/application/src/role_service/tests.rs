use std::sync::Arc;

use async_trait::async_trait;
use inkwell_core::AppResult;
use inkwell_domain::{Permission, PermissionSet, Role};
use tokio::sync::Mutex;

use super::{RoleRepository, RoleService};

#[derive(Default)]
struct FakeRoleRepository {
    roles: Mutex<Vec<Role>>,
}

#[async_trait]
impl RoleRepository for FakeRoleRepository {
    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        let mut roles = self.roles.lock().await.clone();
        roles.sort_by(|left, right| left.name().cmp(right.name()));
        Ok(roles)
    }

    async fn find_role(&self, name: &str) -> AppResult<Option<Role>> {
        Ok(self
            .roles
            .lock()
            .await
            .iter()
            .find(|role| role.name() == name)
            .cloned())
    }

    async fn find_default_role(&self) -> AppResult<Option<Role>> {
        Ok(self
            .roles
            .lock()
            .await
            .iter()
            .find(|role| role.is_default())
            .cloned())
    }

    async fn save_roles(&self, roles: &[Role]) -> AppResult<Vec<Role>> {
        let mut stored = self.roles.lock().await;

        if roles.iter().any(Role::is_default) {
            for role in stored.iter_mut() {
                role.set_default(false);
            }
        }

        for role in roles {
            match stored.iter_mut().find(|existing| existing.name() == role.name()) {
                Some(existing) => *existing = role.clone(),
                None => stored.push(role.clone()),
            }
        }

        Ok(roles.to_vec())
    }
}

fn masks(roles: &[Role]) -> Vec<(String, i32, bool)> {
    let mut values: Vec<(String, i32, bool)> = roles
        .iter()
        .map(|role| {
            (
                role.name().to_owned(),
                role.permissions().to_storage(),
                role.is_default(),
            )
        })
        .collect();
    values.sort();
    values
}

#[tokio::test]
async fn insert_roles_creates_catalog() {
    let repository = Arc::new(FakeRoleRepository::default());
    let service = RoleService::new(repository.clone());

    let seeded = service.insert_roles().await;
    assert!(seeded.is_ok());

    let stored = repository.roles.lock().await.clone();
    assert_eq!(
        masks(&stored),
        vec![
            ("Administrator".to_owned(), 31, false),
            ("Moderator".to_owned(), 15, false),
            ("User".to_owned(), 3, true),
        ]
    );
}

#[tokio::test]
async fn insert_roles_twice_is_idempotent() {
    let repository = Arc::new(FakeRoleRepository::default());
    let service = RoleService::new(repository.clone());

    assert!(service.insert_roles().await.is_ok());
    let first = masks(&repository.roles.lock().await.clone());

    assert!(service.insert_roles().await.is_ok());
    let second = masks(&repository.roles.lock().await.clone());

    assert_eq!(first, second);
    assert_eq!(second.len(), 3);
}

#[tokio::test]
async fn insert_roles_repairs_permission_drift_and_default_flag() {
    let repository = Arc::new(FakeRoleRepository::default());
    let drifted_user = Role::from_parts("User", PermissionSet::all(), false)
        .unwrap_or_else(|_| unreachable!());
    let stale_default = Role::from_parts("Guest", PermissionSet::FOLLOW, true)
        .unwrap_or_else(|_| unreachable!());
    repository
        .roles
        .lock()
        .await
        .extend([drifted_user, stale_default]);

    let service = RoleService::new(repository.clone());
    assert!(service.insert_roles().await.is_ok());

    let stored = repository.roles.lock().await.clone();
    let user = stored.iter().find(|role| role.name() == "User");
    assert!(matches!(
        user,
        Some(role) if role.permissions().to_storage() == 3 && role.is_default()
    ));
    assert!(matches!(user, Some(role) if !role.has_permission(Permission::Write)));

    let defaults = stored.iter().filter(|role| role.is_default()).count();
    assert_eq!(defaults, 1);
}
