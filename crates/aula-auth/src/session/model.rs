//! The active client session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use aula_entity::user::UserRecord;

use crate::jwt::Claims;

/// An authenticated session as restored from storage or created by login.
///
/// This is a plain value: it is handed to whoever needs the user and is never
/// kept in a global. Storage stays the single source of truth for tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Current access token.
    pub access_token: String,
    /// Refresh token, when one was issued.
    pub refresh_token: Option<String>,
    /// Decoded claims of the access token.
    pub claims: Claims,
    /// Normalized user.
    pub user: UserRecord,
}

impl Session {
    /// When the access token expires.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.claims.expires_at()
    }

    /// Whether the access token is expired at `now_ms`.
    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        self.claims.is_expired_at(now_ms)
    }
}
