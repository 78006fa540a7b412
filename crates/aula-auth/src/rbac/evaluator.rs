//! Permission evaluation for UI gating. Pure, no I/O.

use tracing::debug;

use aula_entity::course::{Asignatura, Responsible, Tarea};
use aula_entity::user::{Role, UserRecord};

use super::policies::{ActionPolicies, RoleFlags};

/// Evaluates role, permission, and action checks for a user.
///
/// Every method takes the user explicitly, is synchronous, and returns a
/// plain `bool`. Missing users and unknown inputs are denied.
#[derive(Debug, Clone)]
pub struct PermissionEvaluator {
    /// The action table.
    policies: ActionPolicies,
}

impl PermissionEvaluator {
    /// Creates a new evaluator with the default action table.
    pub fn new() -> Self {
        Self {
            policies: ActionPolicies::new(),
        }
    }

    /// Creates an evaluator with a custom action table.
    pub fn with_policies(policies: ActionPolicies) -> Self {
        Self { policies }
    }

    /// Whether the user's derived role equals any of `roles` (case-insensitive).
    /// Names that are not a canonical role never match.
    pub fn has_role(&self, user: Option<&UserRecord>, roles: &[&str]) -> bool {
        let Some(user) = user else {
            return false;
        };
        let role = user.role();
        roles
            .iter()
            .any(|candidate| candidate.parse::<Role>().is_ok_and(|parsed| parsed == role))
    }

    /// Whether the user holds `code`. Superusers and staff hold every code.
    pub fn has_permission(&self, user: Option<&UserRecord>, code: &str) -> bool {
        let Some(user) = user else {
            return false;
        };
        is_privileged(user) || user.permissions().contains(code)
    }

    /// Whether the user holds at least one of `codes`. False for an empty list
    /// unless the user is superuser or staff.
    pub fn has_any_permission(&self, user: Option<&UserRecord>, codes: &[&str]) -> bool {
        let Some(user) = user else {
            return false;
        };
        is_privileged(user) || codes.iter().any(|code| user.permissions().contains(*code))
    }

    /// Whether the user holds every one of `codes`. True for an empty list.
    pub fn has_all_permissions(&self, user: Option<&UserRecord>, codes: &[&str]) -> bool {
        let Some(user) = user else {
            return false;
        };
        is_privileged(user) || codes.iter().all(|code| user.permissions().contains(*code))
    }

    /// Evaluates a named action from the action table.
    pub fn can(&self, user: Option<&UserRecord>, action: &str) -> bool {
        if !self.policies.contains(action) {
            debug!(action = %action, "Unknown action key");
            return false;
        }
        self.policies.allows(action, &RoleFlags::of(user))
    }

    /// Admins, or the teacher responsible for the course.
    pub fn can_edit_asignatura(&self, user: Option<&UserRecord>, asignatura: &Asignatura) -> bool {
        self.is_admin_or_responsible(user, asignatura)
    }

    /// Admins, or the teacher who owns the task.
    pub fn can_edit_tarea(&self, user: Option<&UserRecord>, tarea: &Tarea) -> bool {
        self.is_admin_or_responsible(user, tarea)
    }

    /// Role flags for the user.
    pub fn role_flags(&self, user: Option<&UserRecord>) -> RoleFlags {
        RoleFlags::of(user)
    }

    /// Whether the user evaluates as administrator.
    pub fn is_admin(&self, user: Option<&UserRecord>) -> bool {
        RoleFlags::of(user).is_admin
    }

    /// Whether the user's derived role is docente.
    pub fn is_docente(&self, user: Option<&UserRecord>) -> bool {
        RoleFlags::of(user).is_docente
    }

    /// Whether the user's derived role is estudiante.
    pub fn is_estudiante(&self, user: Option<&UserRecord>) -> bool {
        RoleFlags::of(user).is_estudiante
    }

    /// Returns a reference to the underlying action table.
    pub fn policies(&self) -> &ActionPolicies {
        &self.policies
    }

    fn is_admin_or_responsible(&self, user: Option<&UserRecord>, entity: &impl Responsible) -> bool {
        let Some(user) = user else {
            return false;
        };
        if RoleFlags::of(Some(user)).is_admin {
            return true;
        }
        match (user.id(), entity.responsible_id()) {
            (Some(user_id), Some(owner_id)) => user_id == owner_id,
            _ => false,
        }
    }
}

impl Default for PermissionEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

fn is_privileged(user: &UserRecord) -> bool {
    user.is_superuser() || user.is_staff()
}
