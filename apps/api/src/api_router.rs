use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post, put};
use inkwell_core::AppError;
use tower_http::trace::TraceLayer;
use tower_sessions::SessionManagerLayer;
use tower_sessions_sqlx_store::PostgresStore;

use crate::state::AppState;
use crate::{auth, handlers, middleware};

mod cors;

pub fn build_router(
    app_state: AppState,
    frontend_url: &str,
    session_layer: SessionManagerLayer<PostgresStore>,
) -> Result<Router, AppError> {
    let protected_routes = Router::new()
        .route(
            "/api/tokens",
            post(auth::issue_token_handler).delete(auth::revoke_token_handler),
        )
        .route("/api/posts", post(handlers::posts::create_post_handler))
        .route(
            "/api/posts/{post_id}",
            put(handlers::posts::update_post_handler),
        )
        .route(
            "/api/posts/{post_id}/like",
            get(handlers::posts::like_status_handler)
                .post(handlers::posts::like_post_handler)
                .delete(handlers::posts::unlike_post_handler),
        )
        .route(
            "/api/posts/{post_id}/comments",
            post(handlers::posts::add_comment_handler),
        )
        .route(
            "/api/comments/{comment_id}/disabled",
            put(handlers::posts::set_comment_disabled_handler),
        )
        .route(
            "/api/tasks",
            get(handlers::tasks::list_tasks_handler).post(handlers::tasks::launch_task_handler),
        )
        .route(
            "/api/tasks/{task_id}/progress",
            get(handlers::tasks::task_progress_handler),
        )
        .route(
            "/api/notifications",
            get(handlers::notifications::list_notifications_handler),
        )
        .route(
            "/api/admin/roles",
            get(handlers::admin::list_roles_handler),
        )
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_auth,
        ));

    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route("/auth/register", post(auth::register_handler))
        .route("/auth/login", post(auth::login_handler))
        .route("/auth/logout", post(auth::logout_handler))
        .route("/auth/me", get(auth::me_handler))
        .route("/api/posts", get(handlers::posts::list_posts_handler))
        .route(
            "/api/posts/{post_id}",
            get(handlers::posts::get_post_handler),
        )
        .route(
            "/api/posts/by-slug/{slug}",
            get(handlers::posts::get_post_by_slug_handler),
        );

    Ok(public_routes
        .merge(protected_routes)
        .with_state(app_state)
        .layer(session_layer)
        .layer(cors::build_cors_layer(frontend_url)?)
        .layer(TraceLayer::new_for_http()))
}
