use std::sync::Arc;

use inkwell_application::{RoleRepository, RoleService};

use super::PostgresRoleRepository;
use crate::test_support::test_pool;

#[tokio::test]
async fn insert_roles_is_idempotent_against_postgres() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = Arc::new(PostgresRoleRepository::new(pool.clone()));
    let service = RoleService::new(repository.clone());

    assert!(service.insert_roles().await.is_ok());
    assert!(service.insert_roles().await.is_ok());

    let roles = repository.list_roles().await.unwrap_or_default();
    let catalog: Vec<(String, i32, bool)> = roles
        .iter()
        .filter(|role| ["User", "Moderator", "Administrator"].contains(&role.name()))
        .map(|role| {
            (
                role.name().to_owned(),
                role.permissions().to_storage(),
                role.is_default(),
            )
        })
        .collect();

    assert_eq!(
        catalog,
        vec![
            ("Administrator".to_owned(), 31, false),
            ("Moderator".to_owned(), 15, false),
            ("User".to_owned(), 3, true),
        ]
    );

    let default_role = repository.find_default_role().await;
    assert!(matches!(default_role, Ok(Some(role)) if role.name() == "User"));
}
