//! Wire contracts of the login and refresh endpoints.
//!
//! The backend uses Spanish field names (`acceso`, `refresco`, `usuario`);
//! English spellings are accepted on input. These types are the only place
//! those names appear.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body returned by the login endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Access token.
    #[serde(rename = "acceso", alias = "access", alias = "access_token")]
    pub access: String,
    /// Refresh token.
    #[serde(rename = "refresco", alias = "refresh", alias = "refresh_token")]
    pub refresh: String,
    /// Raw user profile, keys as the backend sent them.
    #[serde(rename = "usuario", alias = "user", default)]
    pub user: Map<String, Value>,
}

/// Body sent to the login endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    /// Login name.
    pub username: &'a str,
    /// Password.
    pub password: &'a str,
}

/// Body sent to the refresh endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshRequest {
    /// The refresh token being exchanged.
    #[serde(rename = "refresco")]
    pub refresh: String,
}

/// Body returned by the refresh endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshResponse {
    /// New access token.
    #[serde(rename = "acceso", alias = "access", alias = "access_token")]
    pub access: String,
    /// Rotated refresh token, when the backend rotates them.
    #[serde(
        rename = "refresco",
        alias = "refresh",
        alias = "refresh_token",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub refresh: Option<String>,
}
