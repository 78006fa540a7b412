//! User role enumeration and derivation from backend role hints.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::model::RoleRef;

/// Coarse roles recognised by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Platform administrator.
    Administrador,
    /// Teacher responsible for courses and tasks.
    Docente,
    /// Student; also the fallback when nothing else matches.
    Estudiante,
}

impl Role {
    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Administrador => "administrador",
            Self::Docente => "docente",
            Self::Estudiante => "estudiante",
        }
    }

    /// Map a free-form backend role or group name onto a role.
    ///
    /// Case-insensitive substring match, checked in privilege order so a
    /// name such as `"admin docente"` resolves to the higher role.
    pub fn normalize(name: &str) -> Option<Role> {
        let name = name.to_lowercase();
        if name.contains("admin") {
            Some(Self::Administrador)
        } else if name.contains("docente") || name.contains("profesor") {
            Some(Self::Docente)
        } else if name.contains("estudiante") || name.contains("alumno") {
            Some(Self::Estudiante)
        } else {
            None
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Self::Estudiante
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = aula_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "administrador" => Ok(Self::Administrador),
            "docente" => Ok(Self::Docente),
            "estudiante" => Ok(Self::Estudiante),
            _ => Err(aula_core::AppError::validation(format!(
                "Invalid role: '{s}'. Expected one of: administrador, docente, estudiante"
            ))),
        }
    }
}

/// Raw role signals carried by a user, before derivation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleHints {
    /// Backend superuser flag.
    #[serde(default)]
    pub is_superuser: bool,
    /// Backend staff flag.
    #[serde(default)]
    pub is_staff: bool,
    /// Backend-assigned roles, in backend order.
    #[serde(default)]
    pub roles: Vec<RoleRef>,
    /// Single scalar role field, when the backend sends one.
    #[serde(default, rename = "role_hint")]
    pub role: Option<String>,
    /// Group names.
    #[serde(default)]
    pub groups: Vec<String>,
}

/// Derive the single primary role from the raw hints.
///
/// First match wins:
/// 1. superuser
/// 2. first entry of `roles`
/// 3. scalar `role`
/// 4. first normalizable entry of `groups`
/// 5. staff
/// 6. estudiante
///
/// A present but unrecognised name falls through to the next step.
pub fn derive_role(hints: &RoleHints) -> Role {
    if hints.is_superuser {
        return Role::Administrador;
    }

    if let Some(role) = hints.roles.first().and_then(|r| Role::normalize(&r.name)) {
        return role;
    }

    if let Some(role) = hints.role.as_deref().and_then(Role::normalize) {
        return role;
    }

    if let Some(role) = hints.groups.iter().find_map(|g| Role::normalize(g)) {
        return role;
    }

    if hints.is_staff {
        return Role::Administrador;
    }

    Role::Estudiante
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_roles(names: &[&str]) -> RoleHints {
        RoleHints {
            roles: names.iter().map(|n| RoleRef::named(*n)).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_from_str() {
        assert_eq!("Docente".parse::<Role>().unwrap(), Role::Docente);
        assert!("profesor".parse::<Role>().is_err());
    }

    #[test]
    fn test_superuser_wins_over_explicit_role() {
        let mut hints = with_roles(&["Estudiante"]);
        hints.is_superuser = true;
        assert_eq!(derive_role(&hints), Role::Administrador);
    }

    #[test]
    fn test_substring_normalization_to_docente() {
        for name in ["Docentes", "profesor_titular", "Coordinador Docente"] {
            assert_eq!(derive_role(&with_roles(&[name])), Role::Docente, "{name}");
        }
    }

    #[test]
    fn test_unknown_name_falls_back_to_estudiante() {
        assert_eq!(derive_role(&with_roles(&["Invitado"])), Role::Estudiante);
        assert_eq!(derive_role(&RoleHints::default()), Role::Estudiante);
    }

    #[test]
    fn test_only_first_role_entry_is_considered() {
        let hints = with_roles(&["Alumno", "Administrador"]);
        assert_eq!(derive_role(&hints), Role::Estudiante);
    }

    #[test]
    fn test_scalar_role_then_groups() {
        let hints = RoleHints {
            role: Some("PROFESOR".to_string()),
            groups: vec!["administradores".to_string()],
            ..Default::default()
        };
        assert_eq!(derive_role(&hints), Role::Docente);

        let hints = RoleHints {
            groups: vec!["biblioteca".to_string(), "alumnos".to_string()],
            ..Default::default()
        };
        assert_eq!(derive_role(&hints), Role::Estudiante);
    }

    #[test]
    fn test_staff_only_applies_without_other_signal() {
        let staff = RoleHints {
            is_staff: true,
            ..Default::default()
        };
        assert_eq!(derive_role(&staff), Role::Administrador);

        let staff_docente = RoleHints {
            is_staff: true,
            ..with_roles(&["docente"])
        };
        assert_eq!(derive_role(&staff_docente), Role::Docente);
    }
}
