use axum::Json;
use axum::extract::State;
use tracing::warn;

use crate::dto::HealthResponse;
use crate::state::AppState;

pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = match sqlx::query("SELECT 1").execute(&state.postgres_pool).await {
        Ok(_) => "ok",
        Err(error) => {
            warn!(error = %error, "database health check failed");
            "unavailable"
        }
    };

    Json(HealthResponse {
        status: "ok",
        database,
    })
}
