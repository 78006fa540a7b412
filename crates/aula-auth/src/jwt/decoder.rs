//! Client-side JWT decoding.

use jsonwebtoken::dangerous::insecure_decode;

use aula_core::error::AppError;

use super::claims::Claims;

/// Decodes token payloads without verifying signatures.
///
/// The client never holds the backend's signing key; the backend remains the
/// authority on validity and answers 401 for anything it rejects. The header
/// `alg` is not inspected, so HMAC, RSA, EC and EdDSA tokens all decode.
/// Expiry is not enforced here either: callers compare `exp` against their
/// own clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct JwtDecoder;

impl JwtDecoder {
    /// Creates a new decoder.
    pub fn new() -> Self {
        Self
    }

    /// Decodes the claims of a token.
    ///
    /// Fails for anything that is not a three-part token with a JSON payload
    /// carrying a numeric `exp`.
    pub fn decode(&self, token: &str) -> Result<Claims, AppError> {
        let token_data = insecure_decode::<Claims>(token).map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::InvalidToken => {
                AppError::authentication("Invalid token format")
            }
            _ => AppError::authentication(format!("Token decoding failed: {e}")),
        })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::test_support::{token_expiring_in, token_with_claims};

    #[test]
    fn test_decodes_without_knowing_the_secret() {
        let mut extra = serde_json::Map::new();
        extra.insert("user_id".to_string(), serde_json::json!(12));
        let token = token_with_claims(3600, extra);

        let claims = JwtDecoder::new().decode(&token).unwrap();
        assert!(!claims.is_expired_at(chrono::Utc::now().timestamp_millis()));
        assert_eq!(claims.extra["user_id"], serde_json::json!(12));
    }

    #[test]
    fn test_expired_token_still_decodes() {
        let claims = JwtDecoder::new().decode(&token_expiring_in(-60)).unwrap();
        assert!(claims.is_expired_at(chrono::Utc::now().timestamp_millis()));
    }

    #[test]
    fn test_malformed_tokens_fail() {
        let decoder = JwtDecoder::new();
        for token in ["", "not-a-jwt", "a.b.c", "eyJhbGciOiJIUzI1NiJ9.e30."] {
            let err = decoder.decode(token).unwrap_err();
            assert!(err.is_authentication(), "{token}");
        }
    }

    #[test]
    fn test_asymmetric_algorithms_decode() {
        // {"exp":4102444800,"user_id":3}
        let payload = "eyJleHAiOjQxMDI0NDQ4MDAsInVzZXJfaWQiOjN9";
        for header in [
            "eyJhbGciOiJSUzI1NiIsInR5cCI6IkpXVCJ9", // RS256
            "eyJhbGciOiJFUzI1NiIsInR5cCI6IkpXVCJ9", // ES256
        ] {
            let token = format!("{header}.{payload}.c2lnbmF0dXJl");
            let claims = JwtDecoder::new().decode(&token).unwrap();
            assert_eq!(claims.exp, 4_102_444_800);
            assert_eq!(claims.extra["user_id"], serde_json::json!(3));
        }
    }
}
