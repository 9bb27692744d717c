//! Roles and the explicit caller identity threaded through services.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::user::UserId;

/// Fixed application roles.
///
/// The numeric identifiers match the seeded `roles` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full access to every sale and to user management.
    Admin,
    /// Sees and edits only the sales they created.
    Advisor,
}

impl Role {
    /// Every known role, in identifier order.
    pub const ALL: [Role; 2] = [Role::Admin, Role::Advisor];

    /// Stable numeric identifier.
    #[must_use]
    pub const fn id(self) -> i32 {
        match self {
            Self::Admin => 1,
            Self::Advisor => 2,
        }
    }

    /// Resolve a numeric identifier; `None` when no such role exists.
    #[must_use]
    pub const fn from_id(id: i32) -> Option<Self> {
        match id {
            1 => Some(Self::Admin),
            2 => Some(Self::Advisor),
            _ => None,
        }
    }

    /// Display name as seeded in the catalog.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Advisor => "Advisor",
        }
    }
}

/// Authenticated identity making a request.
///
/// Services receive this explicitly; there is no ambient current user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    user_id: UserId,
    role: Role,
}

impl Caller {
    /// Build a caller from a resolved user id and role.
    #[must_use]
    pub fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    /// Identifier of the calling user.
    #[must_use]
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Role of the calling user.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Whether the caller holds the admin role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Whether the caller may act on a record owned by `owner`.
    #[must_use]
    pub fn can_access(&self, owner: &UserId) -> bool {
        self.is_admin() || &self.user_id == owner
    }
}
