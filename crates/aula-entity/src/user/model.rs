//! Canonical user record.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use aula_core::types::{RoleId, UserId};

use super::role::{Role, RoleHints, derive_role};

/// A backend-assigned role reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRef {
    /// Backend role id, when known.
    #[serde(default)]
    pub id: Option<RoleId>,
    /// Role name as sent by the backend.
    pub name: String,
}

impl RoleRef {
    /// Create a role reference carrying only a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }
}

/// The authenticated user as the rest of the client sees it.
///
/// The primary [`Role`] is derived from the role hints when the record is
/// built and again whenever a snapshot is deserialized, so it can never
/// disagree with the flags and roles it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredUser", into = "StoredUser")]
pub struct UserRecord {
    id: Option<UserId>,
    display_name: String,
    hints: RoleHints,
    role: Role,
    permissions: BTreeSet<String>,
}

impl UserRecord {
    /// Build a record and derive its role.
    pub fn new(
        id: Option<UserId>,
        display_name: impl Into<String>,
        hints: RoleHints,
        permissions: impl IntoIterator<Item = String>,
    ) -> Self {
        let role = derive_role(&hints);
        Self {
            id,
            display_name: display_name.into(),
            hints,
            role,
            permissions: permissions.into_iter().collect(),
        }
    }

    /// Backend user id.
    pub fn id(&self) -> Option<&UserId> {
        self.id.as_ref()
    }

    /// Human-readable name.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Derived primary role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Raw backend roles in backend order.
    pub fn roles(&self) -> &[RoleRef] {
        &self.hints.roles
    }

    /// Whether the backend flagged this user as superuser.
    pub fn is_superuser(&self) -> bool {
        self.hints.is_superuser
    }

    /// Whether the backend flagged this user as staff.
    pub fn is_staff(&self) -> bool {
        self.hints.is_staff
    }

    /// The hints the role was derived from.
    pub fn hints(&self) -> &RoleHints {
        &self.hints
    }

    /// Explicit permission codes granted to the user.
    pub fn permissions(&self) -> &BTreeSet<String> {
        &self.permissions
    }
}

/// Persisted snapshot layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredUser {
    #[serde(default)]
    id: Option<UserId>,
    #[serde(default)]
    display_name: String,
    /// Written for readability; recomputed on load.
    #[serde(default, skip_deserializing)]
    role: Option<Role>,
    #[serde(flatten)]
    hints: RoleHints,
    #[serde(default)]
    permissions: BTreeSet<String>,
}

impl From<StoredUser> for UserRecord {
    fn from(stored: StoredUser) -> Self {
        UserRecord::new(
            stored.id,
            stored.display_name,
            stored.hints,
            stored.permissions,
        )
    }
}

impl From<UserRecord> for StoredUser {
    fn from(user: UserRecord) -> Self {
        StoredUser {
            id: user.id,
            display_name: user.display_name,
            role: Some(user.role),
            hints: user.hints,
            permissions: user.permissions,
        }
    }
}
