//! Normalization of raw backend user data into a [`UserRecord`].
//!
//! The backend and its tokens describe the same user under localized and
//! anglicized field names. Everything downstream sees only `UserRecord`.

use serde_json::{Map, Value};

use aula_core::types::{RoleId, UserId};
use aula_entity::user::{RoleHints, RoleRef, UserRecord};

const ID_KEYS: &[&str] = &["id", "user_id", "usuario_id", "sub"];
const DISPLAY_NAME_KEYS: &[&str] = &["nombre_completo", "full_name", "display_name", "name"];
const FIRST_NAME_KEYS: &[&str] = &["nombre", "first_name"];
const LAST_NAME_KEYS: &[&str] = &["apellido", "apellidos", "last_name"];
const LOGIN_NAME_KEYS: &[&str] = &["username", "usuario", "correo", "email"];
const SUPERUSER_KEYS: &[&str] = &["es_superusuario", "is_superuser", "superusuario"];
const STAFF_KEYS: &[&str] = &["es_staff", "is_staff", "staff"];
const ROLES_KEYS: &[&str] = &["roles"];
const ROLE_KEYS: &[&str] = &["rol", "role", "tipo_usuario", "user_type"];
const GROUPS_KEYS: &[&str] = &["grupos", "groups"];
const PERMISSIONS_KEYS: &[&str] = &["permisos", "permissions", "user_permissions"];
const NAME_FIELDS: &[&str] = &["nombre", "name"];
const PERMISSION_CODE_FIELDS: &[&str] = &["codigo", "codename", "code"];

/// Overlay `profile` onto `claims`; profile values win on equal keys.
pub fn merge(claims: Map<String, Value>, profile: &Map<String, Value>) -> Map<String, Value> {
    let mut merged = claims;
    for (key, value) in profile {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

/// Build the canonical user record from a raw field map.
///
/// Flags are true when any spelling is truthy, so a `true` under one name is
/// never lost to a `false` under the other.
pub fn normalize_user(raw: &Map<String, Value>) -> UserRecord {
    let id = first(raw, ID_KEYS).and_then(UserId::from_json);

    let hints = RoleHints {
        is_superuser: any_flag(raw, SUPERUSER_KEYS),
        is_staff: any_flag(raw, STAFF_KEYS),
        roles: first_non_empty(raw, ROLES_KEYS, role_refs),
        role: first(raw, ROLE_KEYS).and_then(name_of),
        groups: first_non_empty(raw, GROUPS_KEYS, names),
    };

    let permissions = first_non_empty(raw, PERMISSIONS_KEYS, permission_codes);

    UserRecord::new(id, display_name(raw), hints, permissions)
}

fn first<'a>(raw: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| raw.get(*key))
        .find(|value| !value.is_null())
}

fn first_non_empty<T>(
    raw: &Map<String, Value>,
    keys: &[&str],
    parse: fn(&Value) -> Vec<T>,
) -> Vec<T> {
    keys.iter()
        .filter_map(|key| raw.get(*key))
        .map(parse)
        .find(|items| !items.is_empty())
        .unwrap_or_default()
}

fn any_flag(raw: &Map<String, Value>, keys: &[&str]) -> bool {
    keys.iter()
        .filter_map(|key| raw.get(*key))
        .any(truthy)
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_i64().is_some_and(|n| n != 0),
        Value::String(s) => matches!(
            s.trim().to_lowercase().as_str(),
            "true" | "1" | "si" | "sí" | "yes"
        ),
        _ => false,
    }
}

fn text(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// A name given either as a string or as an object with a name field.
fn name_of(value: &Value) -> Option<String> {
    match value {
        Value::Object(obj) => NAME_FIELDS
            .iter()
            .filter_map(|field| obj.get(*field))
            .find_map(text),
        other => text(other),
    }
}

fn role_refs(value: &Value) -> Vec<RoleRef> {
    let Some(items) = value.as_array() else {
        return name_of(value).map(RoleRef::named).into_iter().collect();
    };
    items
        .iter()
        .filter_map(|item| {
            let name = name_of(item)?;
            let id = item.get("id").and_then(RoleId::from_json);
            Some(RoleRef { id, name })
        })
        .collect()
}

fn names(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(name_of).collect(),
        Value::String(s) => s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        other => name_of(other).into_iter().collect(),
    }
}

fn permission_codes(value: &Value) -> Vec<String> {
    let Some(items) = value.as_array() else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match item {
            Value::Object(obj) => PERMISSION_CODE_FIELDS
                .iter()
                .filter_map(|field| obj.get(*field))
                .find_map(text),
            other => text(other),
        })
        .collect()
}

fn display_name(raw: &Map<String, Value>) -> String {
    if let Some(name) = first(raw, DISPLAY_NAME_KEYS).and_then(text) {
        return name;
    }

    let given = first(raw, FIRST_NAME_KEYS).and_then(text);
    let family = first(raw, LAST_NAME_KEYS).and_then(text);
    match (given, family) {
        (Some(g), Some(f)) => return format!("{g} {f}"),
        (Some(g), None) => return g,
        (None, Some(f)) => return f,
        (None, None) => {}
    }

    first(raw, LOGIN_NAME_KEYS)
        .and_then(text)
        .unwrap_or_default()
}
