use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use inkwell_domain::UserId;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

pub(crate) async fn test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        return None;
    };

    let pool = match PgPoolOptions::new()
        .max_connections(2)
        .connect(database_url.as_str())
        .await
    {
        Ok(pool) => pool,
        Err(error) => panic!("failed to connect to DATABASE_URL in test: {error}"),
    };

    if let Err(error) = MIGRATOR.run(&pool).await {
        panic!("failed to run migrations for postgres repository tests: {error}");
    }

    Some(pool)
}

pub(crate) async fn insert_user(pool: &PgPool) -> UserId {
    let id = Uuid::new_v4();
    let insert = sqlx::query(
        r#"
            INSERT INTO users (id, email, username, password_hash)
            VALUES ($1, $2, $3, 'unused')
            "#,
    )
    .bind(id)
    .bind(format!("{id}@example.com"))
    .bind(format!("user-{id}"))
    .execute(pool)
    .await;

    assert!(insert.is_ok());
    UserId::from_uuid(id)
}
