//! Authorization module - role hierarchy and permission evaluation
//!
//! Two requirement shapes are supported on purpose:
//! - an explicit allow-list of roles, evaluated by set membership
//!   (e.g. "admin or tech_lead may create a kudo"), and
//! - a single minimum role, evaluated by hierarchy rank
//!   (e.g. "at least a team_lead").

mod evaluator;

pub use evaluator::PermissionEvaluator;

use crate::models::Role;

/// A caller-supplied authorization requirement. Built at the call site,
/// never persisted.
#[derive(Debug, Clone, PartialEq)]
pub enum RoleRequirement {
    /// Hierarchy semantics: the session's role must rank at or above this.
    AtLeast(Role),
    /// Set semantics: the session's role must be one of these, rank ignored.
    AnyOf(Vec<Role>),
}

impl RoleRequirement {
    pub fn any_of(roles: impl IntoIterator<Item = Role>) -> Self {
        Self::AnyOf(roles.into_iter().collect())
    }
}

/// Explicit, ordered role hierarchy. Constructed once and handed to the
/// evaluator rather than living as a free-floating constant map.
///
/// The original application only pinned down the two extreme ranks; the
/// mid-privilege roles are slotted between them here (see DESIGN.md).
#[derive(Debug, Clone)]
pub struct RoleHierarchy {
    ranks: Vec<(Role, u8)>,
}

impl RoleHierarchy {
    pub fn standard() -> Self {
        Self {
            ranks: vec![
                (Role::User, 0),
                (Role::TeamLead, 1),
                (Role::TechLead, 2),
                (Role::Admin, 3),
            ],
        }
    }

    pub fn rank(&self, role: Role) -> u8 {
        self.ranks
            .iter()
            .find(|(r, _)| *r == role)
            .map(|(_, rank)| *rank)
            .unwrap_or(0)
    }
}

impl Default for RoleHierarchy {
    fn default() -> Self {
        Self::standard()
    }
}
