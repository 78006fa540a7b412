//! Newtype wrappers for backend-assigned entity identifiers.
//!
//! The backend emits ids as JSON numbers or strings depending on the
//! endpoint. Every id is normalized to its string form on deserialization so
//! that `7` and `"7"` compare equal.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Macro to define a newtype ID wrapper around a normalized string.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create an identifier from any displayable value.
            pub fn new(value: impl fmt::Display) -> Self {
                Self(value.to_string())
            }

            /// Build an identifier from a raw JSON value.
            ///
            /// Accepts strings and numbers; anything else (including an
            /// empty string) yields `None`.
            pub fn from_json(value: &serde_json::Value) -> Option<Self> {
                match value {
                    serde_json::Value::String(s) if !s.trim().is_empty() => {
                        Some(Self(s.trim().to_string()))
                    }
                    serde_json::Value::Number(n) => Some(Self(n.to_string())),
                    _ => None,
                }
            }

            /// Return the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value.to_string())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = serde_json::Value::deserialize(deserializer)?;
                Self::from_json(&raw).ok_or_else(|| {
                    serde::de::Error::custom(format!(
                        "expected a string or number identifier, got {raw}"
                    ))
                })
            }
        }
    };
}

define_id!(
    /// Unique identifier for a user.
    UserId
);

define_id!(
    /// Unique identifier for a backend role.
    RoleId
);

define_id!(
    /// Unique identifier for a course (asignatura).
    AsignaturaId
);

define_id!(
    /// Unique identifier for a task (tarea).
    TareaId
);
