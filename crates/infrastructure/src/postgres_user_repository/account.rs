use super::*;

impl PostgresUserRepository {
    pub(super) async fn create_impl(&self, input: CreateUserInput) -> AppResult<User> {
        let id = uuid::Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO users (id, email, username, password_hash, role_id)
            VALUES ($1, LOWER($2), $3, $4, (SELECT id FROM roles WHERE name = $5))
            "#,
        )
        .bind(id)
        .bind(input.email.as_str())
        .bind(input.username.as_str())
        .bind(input.password_hash.as_str())
        .bind(input.role_name.as_deref())
        .execute(&self.pool)
        .await
        .map_err(|error| account_conflict_or_internal(error, "create user"))?;

        self.find_by_id_impl(UserId::from_uuid(id))
            .await?
            .map(|account| account.user)
            .ok_or_else(|| AppError::Internal(format!("created user '{id}' is missing")))
    }

    pub(super) async fn touch_last_seen_impl(&self, user_id: UserId) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET last_seen = now()
            WHERE id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to update last seen: {error}")))?;

        Ok(())
    }
}
