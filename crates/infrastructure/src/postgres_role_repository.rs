//! PostgreSQL-backed role repository.

use async_trait::async_trait;
use sqlx::PgPool;

use inkwell_application::RoleRepository;
use inkwell_core::{AppError, AppResult};
use inkwell_domain::{PermissionSet, Role};

/// PostgreSQL implementation of the role repository port.
#[derive(Clone)]
pub struct PostgresRoleRepository {
    pool: PgPool,
}

impl PostgresRoleRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct RoleRow {
    name: String,
    permissions: i32,
    is_default: bool,
}

impl TryFrom<RoleRow> for Role {
    type Error = AppError;

    fn try_from(row: RoleRow) -> Result<Self, Self::Error> {
        Role::from_parts(
            row.name,
            PermissionSet::from_storage(row.permissions)?,
            row.is_default,
        )
    }
}

#[async_trait]
impl RoleRepository for PostgresRoleRepository {
    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        let rows = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT name, permissions, is_default
            FROM roles
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list roles: {error}")))?;

        rows.into_iter().map(Role::try_from).collect()
    }

    async fn find_role(&self, name: &str) -> AppResult<Option<Role>> {
        let row = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT name, permissions, is_default
            FROM roles
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find role '{name}': {error}")))?;

        row.map(Role::try_from).transpose()
    }

    async fn find_default_role(&self) -> AppResult<Option<Role>> {
        let row = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT name, permissions, is_default
            FROM roles
            WHERE is_default
            "#,
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find default role: {error}")))?;

        row.map(Role::try_from).transpose()
    }

    async fn save_roles(&self, roles: &[Role]) -> AppResult<Vec<Role>> {
        let mut transaction = self.pool.begin().await.map_err(|error| {
            AppError::Internal(format!("failed to start role transaction: {error}"))
        })?;

        // Serializes concurrent seeding runs.
        sqlx::query("LOCK TABLE roles IN SHARE ROW EXCLUSIVE MODE")
            .execute(&mut *transaction)
            .await
            .map_err(|error| AppError::Internal(format!("failed to lock roles: {error}")))?;

        if roles.iter().any(Role::is_default) {
            sqlx::query("UPDATE roles SET is_default = FALSE WHERE is_default")
                .execute(&mut *transaction)
                .await
                .map_err(|error| {
                    AppError::Internal(format!("failed to clear default role: {error}"))
                })?;
        }

        let mut saved = Vec::with_capacity(roles.len());
        for role in roles {
            let row = sqlx::query_as::<_, RoleRow>(
                r#"
                INSERT INTO roles (name, permissions, is_default)
                VALUES ($1, $2, $3)
                ON CONFLICT (name) DO UPDATE
                SET permissions = EXCLUDED.permissions,
                    is_default = EXCLUDED.is_default
                RETURNING name, permissions, is_default
                "#,
            )
            .bind(role.name())
            .bind(role.permissions().to_storage())
            .bind(role.is_default())
            .fetch_one(&mut *transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to save role '{}': {error}", role.name()))
            })?;

            saved.push(Role::try_from(row)?);
        }

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit role transaction: {error}"))
        })?;

        Ok(saved)
    }
}

#[cfg(test)]
mod tests;
