//! Action-to-role mapping definitions.

use std::collections::HashMap;

use aula_entity::user::{Role, UserRecord};

/// Role booleans every action predicate is written against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoleFlags {
    /// Derived administrator, or backend superuser/staff.
    pub is_admin: bool,
    /// Derived teacher.
    pub is_docente: bool,
    /// Derived student.
    pub is_estudiante: bool,
}

impl RoleFlags {
    /// Computes the flags for a user; all false when there is no user.
    pub fn of(user: Option<&UserRecord>) -> Self {
        let Some(user) = user else {
            return Self::default();
        };
        let role = user.role();
        Self {
            is_admin: role == Role::Administrador || user.is_superuser() || user.is_staff(),
            is_docente: role == Role::Docente,
            is_estudiante: role == Role::Estudiante,
        }
    }

    fn any(&self) -> bool {
        self.is_admin || self.is_docente || self.is_estudiante
    }
}

/// A predicate over role flags.
pub type ActionPredicate = fn(&RoleFlags) -> bool;

/// The closed table of named UI actions.
#[derive(Debug, Clone)]
pub struct ActionPolicies {
    /// Action key → predicate.
    policies: HashMap<&'static str, ActionPredicate>,
}

impl ActionPolicies {
    /// Creates the default action table.
    pub fn new() -> Self {
        let entries: [(&'static str, ActionPredicate); 17] = [
            // Users and roles
            ("manage_users", |f| f.is_admin),
            ("view_users", |f| f.is_admin || f.is_docente),
            ("manage_roles", |f| f.is_admin),
            // Courses
            ("create_asignaturas", |f| f.is_admin),
            ("edit_asignaturas", |f| f.is_admin),
            ("delete_asignaturas", |f| f.is_admin),
            ("view_asignaturas", |f| f.any()),
            // Tasks
            ("create_tareas", |f| f.is_admin || f.is_docente),
            ("edit_tareas", |f| f.is_admin || f.is_docente),
            ("delete_tareas", |f| f.is_admin || f.is_docente),
            ("view_tareas", |f| f.any()),
            ("submit_tareas", |f| f.is_estudiante),
            // Submissions and grades
            ("view_submissions", |f| f.is_admin || f.is_docente),
            ("grade_submissions", |f| f.is_admin || f.is_docente),
            ("view_all_grades", |f| f.is_admin || f.is_docente),
            ("view_own_grades", |f| f.is_estudiante),
            // Reports
            ("view_reports", |f| f.is_admin),
        ];

        Self {
            policies: entries.into_iter().collect(),
        }
    }

    /// Adds or replaces an action.
    pub fn with_action(mut self, action: &'static str, predicate: ActionPredicate) -> Self {
        self.policies.insert(action, predicate);
        self
    }

    /// Evaluates an action; unknown keys are denied.
    pub fn allows(&self, action: &str, flags: &RoleFlags) -> bool {
        self.policies
            .get(action)
            .is_some_and(|predicate| predicate(flags))
    }

    /// Whether the action key exists.
    pub fn contains(&self, action: &str) -> bool {
        self.policies.contains_key(action)
    }

    /// All action keys, sorted.
    pub fn actions(&self) -> Vec<&'static str> {
        let mut keys: Vec<_> = self.policies.keys().copied().collect();
        keys.sort_unstable();
        keys
    }
}

impl Default for ActionPolicies {
    fn default() -> Self {
        Self::new()
    }
}
