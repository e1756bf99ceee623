use inkwell_domain::Role;
use serde::Serialize;
use ts_rs::TS;

/// API representation of a role.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/role-response.ts"
)]
pub struct RoleResponse {
    pub name: String,
    pub permissions: Vec<String>,
    pub permission_mask: i32,
    pub is_default: bool,
}

impl From<Role> for RoleResponse {
    fn from(role: Role) -> Self {
        Self {
            name: role.name().to_owned(),
            permissions: role
                .permissions()
                .permissions()
                .into_iter()
                .map(|permission| permission.as_str().to_owned())
                .collect(),
            permission_mask: role.permissions().to_storage(),
            is_default: role.is_default(),
        }
    }
}
