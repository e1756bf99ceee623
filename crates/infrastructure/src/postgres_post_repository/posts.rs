use super::*;

impl PostgresPostRepository {
    pub(super) async fn create_post_impl(
        &self,
        author_id: UserId,
        post: &NewPost,
    ) -> AppResult<Post> {
        let mut transaction = self.pool.begin().await.map_err(|error| {
            AppError::Internal(format!("failed to start post transaction: {error}"))
        })?;

        let row = sqlx::query_as::<_, PostRow>(
            r#"
            INSERT INTO posts (title, slug, body, author_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, slug, body, author_id, created_at
            "#,
        )
        .bind(post.title())
        .bind(post.slug())
        .bind(post.body())
        .bind(author_id.as_uuid())
        .fetch_one(&mut *transaction)
        .await
        .map_err(|error| {
            if let sqlx::Error::Database(ref database_error) = error
                && database_error.code().as_deref() == Some("23505")
            {
                return AppError::Conflict(format!(
                    "a post with slug '{}' already exists",
                    post.slug().unwrap_or_default()
                ));
            }

            AppError::Internal(format!("failed to create post: {error}"))
        })?;

        for tag in post.tags() {
            let tag_id = sqlx::query_scalar::<_, i64>(
                r#"
                INSERT INTO tags (name, slug)
                VALUES ($1, $2)
                ON CONFLICT (slug) DO UPDATE SET slug = EXCLUDED.slug
                RETURNING id
                "#,
            )
            .bind(tag.name())
            .bind(tag.slug())
            .fetch_one(&mut *transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to save tag '{}': {error}", tag.name()))
            })?;

            sqlx::query(
                r#"
                INSERT INTO post_tags (post_id, tag_id)
                VALUES ($1, $2)
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(row.id)
            .bind(tag_id)
            .execute(&mut *transaction)
            .await
            .map_err(|error| AppError::Internal(format!("failed to tag post: {error}")))?;
        }

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit post transaction: {error}"))
        })?;

        Ok(row.into_post(post.tags().to_vec()))
    }

    pub(super) async fn list_posts_impl(&self, offset: i64, limit: i64) -> AppResult<PostListing> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM posts")
            .fetch_one(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to count posts: {error}")))?;

        let rows = sqlx::query_as::<_, SummaryRow>(&format!(
            r#"
            SELECT {SUMMARY_COLUMNS}
            FROM posts
            ORDER BY posts.created_at DESC, posts.id DESC
            OFFSET $1
            LIMIT $2
            "#
        ))
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list posts: {error}")))?;

        Ok(PostListing {
            items: self.attach_tags(rows).await?,
            total,
        })
    }

    pub(super) async fn find_post_impl(&self, post_id: i64) -> AppResult<Option<PostSummary>> {
        let row = sqlx::query_as::<_, SummaryRow>(&format!(
            r#"
            SELECT {SUMMARY_COLUMNS}
            FROM posts
            WHERE posts.id = $1
            "#
        ))
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find post {post_id}: {error}")))?;

        Ok(self.attach_tags(row.into_iter().collect()).await?.pop())
    }

    pub(super) async fn find_post_by_slug_impl(
        &self,
        slug: &str,
    ) -> AppResult<Option<PostSummary>> {
        let row = sqlx::query_as::<_, SummaryRow>(&format!(
            r#"
            SELECT {SUMMARY_COLUMNS}
            FROM posts
            WHERE posts.slug = $1
            "#
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find post '{slug}': {error}")))?;

        Ok(self.attach_tags(row.into_iter().collect()).await?.pop())
    }

    pub(super) async fn update_post_body_impl(
        &self,
        post_id: i64,
        body: &str,
    ) -> AppResult<Option<Post>> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            UPDATE posts
            SET body = $2
            WHERE id = $1
            RETURNING id, title, slug, body, author_id, created_at
            "#,
        )
        .bind(post_id)
        .bind(body)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to update post {post_id}: {error}")))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let mut tags = self.load_tags(&[row.id]).await?;
        Ok(Some(row.into_post(tags.remove(&post_id).unwrap_or_default())))
    }

    async fn attach_tags(&self, rows: Vec<SummaryRow>) -> AppResult<Vec<PostSummary>> {
        let post_ids: Vec<i64> = rows.iter().map(|row| row.post.id).collect();
        let mut tags = self.load_tags(&post_ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let post_tags = tags.remove(&row.post.id).unwrap_or_default();
                PostSummary {
                    post: row.post.into_post(post_tags),
                    comment_count: row.comment_count,
                    like_count: row.like_count,
                }
            })
            .collect())
    }

    async fn load_tags(&self, post_ids: &[i64]) -> AppResult<HashMap<i64, Vec<Tag>>> {
        if post_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, PostTagRow>(
            r#"
            SELECT post_tags.post_id, tags.name
            FROM post_tags
            JOIN tags ON tags.id = post_tags.tag_id
            WHERE post_tags.post_id = ANY($1)
            ORDER BY tags.slug
            "#,
        )
        .bind(post_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load post tags: {error}")))?;

        let mut tags: HashMap<i64, Vec<Tag>> = HashMap::new();
        for row in rows {
            tags.entry(row.post_id).or_default().push(Tag::new(row.name)?);
        }
        Ok(tags)
    }
}
