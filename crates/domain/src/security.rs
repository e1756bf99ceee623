use std::str::FromStr;

use bitflags::bitflags;
use inkwell_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Capabilities a role can grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Allows following other users.
    Follow,
    /// Allows commenting on posts.
    Comment,
    /// Allows writing posts.
    Write,
    /// Allows moderating comments written by others.
    Moderate,
    /// Allows administering the site.
    Admin,
}

bitflags! {
    /// A permission mask as stored on a role.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PermissionSet: u32 {
        /// See [`Permission::Follow`].
        const FOLLOW = 1;
        /// See [`Permission::Comment`].
        const COMMENT = 2;
        /// See [`Permission::Write`].
        const WRITE = 4;
        /// See [`Permission::Moderate`].
        const MODERATE = 8;
        /// See [`Permission::Admin`].
        const ADMIN = 16;
    }
}

// Every flag must be a single bit and no two flags may share one.
const _: () = {
    let bits = [
        PermissionSet::FOLLOW.bits(),
        PermissionSet::COMMENT.bits(),
        PermissionSet::WRITE.bits(),
        PermissionSet::MODERATE.bits(),
        PermissionSet::ADMIN.bits(),
    ];

    let mut seen = 0_u32;
    let mut index = 0;
    while index < bits.len() {
        assert!(bits[index].count_ones() == 1);
        assert!(seen & bits[index] == 0);
        seen |= bits[index];
        index += 1;
    }
};

impl Permission {
    /// Returns a stable transport value for this permission.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Follow => "follow",
            Self::Comment => "comment",
            Self::Write => "write",
            Self::Moderate => "moderate",
            Self::Admin => "admin",
        }
    }

    /// Returns the single-bit mask for this permission.
    #[must_use]
    pub const fn as_set(self) -> PermissionSet {
        match self {
            Self::Follow => PermissionSet::FOLLOW,
            Self::Comment => PermissionSet::COMMENT,
            Self::Write => PermissionSet::WRITE,
            Self::Moderate => PermissionSet::MODERATE,
            Self::Admin => PermissionSet::ADMIN,
        }
    }

    /// Returns all known permissions in ascending bit order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Permission] = &[
            Permission::Follow,
            Permission::Comment,
            Permission::Write,
            Permission::Moderate,
            Permission::Admin,
        ];

        ALL
    }
}

impl FromStr for Permission {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "follow" => Ok(Self::Follow),
            "comment" => Ok(Self::Comment),
            "write" => Ok(Self::Write),
            "moderate" => Ok(Self::Moderate),
            "admin" => Ok(Self::Admin),
            _ => Err(AppError::Validation(format!(
                "unknown permission value '{value}'"
            ))),
        }
    }
}

impl From<Permission> for PermissionSet {
    fn from(permission: Permission) -> Self {
        permission.as_set()
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::empty(), |mask, permission| mask | permission.as_set())
    }
}

impl PermissionSet {
    /// Returns whether every bit of `permission` is present in the mask.
    #[must_use]
    pub fn has_permission(self, permission: impl Into<PermissionSet>) -> bool {
        let requested = permission.into();
        self & requested == requested
    }

    /// Returns the mask with `permission` added.
    #[must_use]
    pub fn add_permission(self, permission: impl Into<PermissionSet>) -> Self {
        self | permission.into()
    }

    /// Returns the mask with `permission` removed.
    #[must_use]
    pub fn remove_permission(self, permission: impl Into<PermissionSet>) -> Self {
        self & !permission.into()
    }

    /// Returns the empty mask.
    #[must_use]
    pub fn reset_permissions() -> Self {
        Self::empty()
    }

    /// Lists the individual permissions contained in the mask.
    #[must_use]
    pub fn permissions(self) -> Vec<Permission> {
        Permission::all()
            .iter()
            .copied()
            .filter(|permission| self.has_permission(*permission))
            .collect()
    }

    /// Restores a mask read from storage. Unknown bits are rejected.
    pub fn from_storage(value: i32) -> AppResult<Self> {
        let bits = u32::try_from(value).map_err(|_| {
            AppError::Validation(format!("permission mask must not be negative, got {value}"))
        })?;

        Self::from_bits(bits).ok_or_else(|| {
            AppError::Validation(format!("permission mask {value} contains unknown bits"))
        })
    }

    /// Returns the storage value for this mask.
    #[must_use]
    pub fn to_storage(self) -> i32 {
        // All defined bits fit into the low byte.
        self.bits() as i32
    }
}
