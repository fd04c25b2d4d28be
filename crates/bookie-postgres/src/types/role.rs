//! Role enumeration for coarse, hierarchical access control.

use std::cmp;

use diesel_derive_enum::DbEnum;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Defines the access level of an identity.
///
/// This enumeration corresponds to the `USER_ROLE` PostgreSQL enum. Every
/// identity holds exactly one role; roles are ordered `user < admin < superadmin`.
///
/// Parsing is ASCII case-insensitive, so `"Admin"` and `"ADMIN"` both yield
/// [`Role::Admin`]. Any other string fails to parse.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash)]
#[derive(Serialize, Deserialize, DbEnum, AsRefStr, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::UserRole"]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(try_from = "String")]
pub enum Role {
    /// Regular identity without administrative capabilities.
    #[db_rename = "user"]
    #[serde(rename = "user")]
    #[default]
    User,

    /// Administrator; may manage other identities.
    #[db_rename = "admin"]
    #[serde(rename = "admin")]
    Admin,

    /// Highest level; may additionally grant the superadmin role.
    #[db_rename = "superadmin"]
    #[serde(rename = "superadmin")]
    SuperAdmin,
}

impl Role {
    /// Roles allowed to perform administrative actions.
    pub const ADMINISTRATORS: &'static [Role] = &[Role::Admin, Role::SuperAdmin];

    /// Returns whether this role has administrative privileges.
    #[inline]
    pub fn is_administrator(self) -> bool {
        matches!(self, Role::Admin | Role::SuperAdmin)
    }

    /// Returns the hierarchical level of this role (higher number = more permissions).
    #[inline]
    pub const fn hierarchy_level(self) -> u8 {
        match self {
            Role::User => 1,
            Role::Admin => 2,
            Role::SuperAdmin => 3,
        }
    }

    /// Returns whether this role has equal or higher permissions than the other role.
    #[inline]
    pub const fn has_permission_level_of(self, other: Role) -> bool {
        self.hierarchy_level() >= other.hierarchy_level()
    }
}

impl TryFrom<String> for Role {
    type Error = strum::ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl PartialOrd for Role {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Role {
    fn cmp(&self, other: &Self) -> cmp::Ordering {
        self.hierarchy_level().cmp(&other.hierarchy_level())
    }
}
