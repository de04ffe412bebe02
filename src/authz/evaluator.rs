use super::{RoleHierarchy, RoleRequirement};
use crate::models::Role;

/// Pure permission evaluator, no I/O and no session state.
///
/// Evaluation:
/// 1. no role (unauthenticated caller) -> deny
/// 2. `AnyOf` -> membership test, hierarchy ignored
/// 3. `AtLeast` -> rank comparison against the hierarchy
#[derive(Debug, Clone, Default)]
pub struct PermissionEvaluator {
    hierarchy: RoleHierarchy,
}

impl PermissionEvaluator {
    pub fn new(hierarchy: RoleHierarchy) -> Self {
        Self { hierarchy }
    }

    /// Entry point used by the session: an absent role denies everything.
    pub fn evaluate(&self, role: Option<Role>, requirement: &RoleRequirement) -> bool {
        let Some(role) = role else {
            tracing::debug!(requirement = ?requirement, "permission denied: no identity");
            return false;
        };
        self.evaluate_role(role, requirement)
    }

    pub fn evaluate_role(&self, role: Role, requirement: &RoleRequirement) -> bool {
        let allowed = match requirement {
            RoleRequirement::AnyOf(roles) => roles.contains(&role),
            RoleRequirement::AtLeast(required) => {
                self.hierarchy.rank(role) >= self.hierarchy.rank(*required)
            }
        };

        tracing::debug!(
            role = %role,
            requirement = ?requirement,
            allowed,
            "permission evaluated"
        );
        allowed
    }
}
