//! Roles: named bundles of permission bits.

use inkwell_core::{AppResult, NonEmptyString};

use crate::{Permission, PermissionSet};

/// Name of the role every new account receives unless another applies.
pub const DEFAULT_ROLE_NAME: &str = "User";

/// Name of the role granted to the configured administrator email.
pub const ADMINISTRATOR_ROLE_NAME: &str = "Administrator";

/// Maximum role name length.
pub const ROLE_NAME_MAX_LENGTH: usize = 64;

/// Seed entry describing the permissions one built-in role must hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleSeed {
    /// Unique role name.
    pub name: &'static str,
    /// Permissions granted, in the order they are added.
    pub permissions: &'static [Permission],
}

/// Built-in roles maintained by the seeding routine.
pub const ROLE_CATALOG: &[RoleSeed] = &[
    RoleSeed {
        name: DEFAULT_ROLE_NAME,
        permissions: &[Permission::Follow, Permission::Comment],
    },
    RoleSeed {
        name: "Moderator",
        permissions: &[
            Permission::Follow,
            Permission::Comment,
            Permission::Write,
            Permission::Moderate,
        ],
    },
    RoleSeed {
        name: ADMINISTRATOR_ROLE_NAME,
        permissions: &[
            Permission::Follow,
            Permission::Comment,
            Permission::Write,
            Permission::Moderate,
            Permission::Admin,
        ],
    },
];

/// A named permission bundle assigned to users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    name: NonEmptyString,
    permissions: PermissionSet,
    is_default: bool,
}

impl Role {
    /// Creates a role with an empty mask that is not the default.
    pub fn new(name: impl Into<String>) -> AppResult<Self> {
        Ok(Self {
            name: NonEmptyString::with_max_chars("role name", name, ROLE_NAME_MAX_LENGTH)?,
            permissions: PermissionSet::empty(),
            is_default: false,
        })
    }

    /// Restores a role from stored values.
    pub fn from_parts(
        name: impl Into<String>,
        permissions: PermissionSet,
        is_default: bool,
    ) -> AppResult<Self> {
        let mut role = Self::new(name)?;
        role.permissions = permissions;
        role.is_default = is_default;
        Ok(role)
    }

    /// Returns the unique role name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the permission mask.
    #[must_use]
    pub fn permissions(&self) -> PermissionSet {
        self.permissions
    }

    /// Returns whether new accounts receive this role.
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.is_default
    }

    /// Returns whether the role grants every bit of `permission`.
    #[must_use]
    pub fn has_permission(&self, permission: impl Into<PermissionSet>) -> bool {
        self.permissions.has_permission(permission)
    }

    /// Grants `permission`.
    pub fn add_permission(&mut self, permission: impl Into<PermissionSet>) {
        self.permissions = self.permissions.add_permission(permission);
    }

    /// Revokes `permission`.
    pub fn remove_permission(&mut self, permission: impl Into<PermissionSet>) {
        self.permissions = self.permissions.remove_permission(permission);
    }

    /// Revokes every permission.
    pub fn reset_permissions(&mut self) {
        self.permissions = PermissionSet::reset_permissions();
    }

    /// Marks or unmarks the role as the default.
    pub fn set_default(&mut self, is_default: bool) {
        self.is_default = is_default;
    }

    /// Brings the role in line with a seed entry, regardless of prior state.
    pub fn apply_seed(&mut self, seed: &RoleSeed, default_role_name: &str) {
        self.reset_permissions();
        for permission in seed.permissions {
            self.add_permission(*permission);
        }
        self.set_default(self.name() == default_role_name);
    }
}
