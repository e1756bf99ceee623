use super::*;

impl PostgresUserRepository {
    pub(super) async fn store_token_impl(
        &self,
        user_id: UserId,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET token_hash = $2, token_expires_at = $3
            WHERE id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(token_hash)
        .bind(expires_at)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to store api token: {error}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("user '{user_id}' does not exist")));
        }

        Ok(())
    }

    pub(super) async fn expire_token_impl(
        &self,
        user_id: UserId,
        expires_at: DateTime<Utc>,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET token_expires_at = $2
            WHERE id = $1 AND token_hash IS NOT NULL
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(expires_at)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to revoke api token: {error}")))?;

        Ok(())
    }

    pub(super) async fn find_by_token_hash_impl(
        &self,
        token_hash: &str,
    ) -> AppResult<Option<TokenOwner>> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            r#"
            SELECT {ACCOUNT_COLUMNS}
            FROM users
            LEFT JOIN roles ON roles.id = users.role_id
            WHERE users.token_hash = $1
            "#
        ))
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find api token: {error}")))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let Some(expires_at) = row.token_expires_at else {
            return Ok(None);
        };

        Ok(Some(TokenOwner {
            user: row.into_account()?.user,
            expires_at,
        }))
    }
}
