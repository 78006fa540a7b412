//! Backend REST API configuration.

use serde::{Deserialize, Serialize};

/// Where the backend lives and which endpoints issue tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL all request paths are joined onto.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Path of the credential login endpoint.
    #[serde(default = "default_login_path")]
    pub login_path: String,
    /// Path of the token refresh endpoint.
    #[serde(default = "default_refresh_path")]
    pub refresh_path: String,
    /// Transport timeout in seconds, applied to every request including refresh.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            login_path: default_login_path(),
            refresh_path: default_refresh_path(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_login_path() -> String {
    "/api/auth/login/".to_string()
}

fn default_refresh_path() -> String {
    "/api/auth/token/refresh/".to_string()
}

fn default_timeout() -> u64 {
    30
}
