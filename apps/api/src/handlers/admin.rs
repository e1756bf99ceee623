use axum::Json;
use axum::extract::{Extension, State};
use inkwell_core::UserIdentity;
use inkwell_domain::Permission;

use crate::dto::RoleResponse;
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_roles_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<RoleResponse>>> {
    state
        .authorization_service
        .require(&identity, Permission::Admin)
        .await?;

    let roles = state
        .role_service
        .list_roles()
        .await?
        .into_iter()
        .map(RoleResponse::from)
        .collect();

    Ok(Json(roles))
}
