//! Session lifecycle manager: restore, login, logout, refresh-on-401.

use std::future::Future;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use aula_core::config::ApiConfig;
use aula_core::error::AppError;
use aula_core::traits::{HttpTransport, SessionStorage};
use aula_core::types::{ApiRequest, ApiResponse};
use aula_entity::user::UserRecord;

use crate::jwt::{Claims, JwtDecoder};

use super::model::Session;
use super::profile::{merge, normalize_user};
use super::redirect::LoginRedirect;
use super::wire::{LoginResponse, RefreshRequest, RefreshResponse};
use super::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, SESSION_KEYS, USER_DATA_KEY};

/// Owns the persisted token pair and keeps outbound requests authorized.
///
/// Holds no session in memory: every operation reads or writes the storage
/// backend, which is the single source of truth for the current tokens.
#[derive(Clone)]
pub struct SessionManager {
    /// Durable key/value storage.
    storage: Arc<dyn SessionStorage>,
    /// Transport used for the refresh call; bypasses the interceptors.
    transport: Arc<dyn HttpTransport>,
    /// Navigation to the login entry point.
    redirect: Arc<dyn LoginRedirect>,
    /// Claim decoder.
    decoder: JwtDecoder,
    /// Refresh endpoint path.
    refresh_path: String,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("storage", &self.storage)
            .field("refresh_path", &self.refresh_path)
            .finish()
    }
}

impl SessionManager {
    /// Creates a new session manager with all required collaborators.
    pub fn new(
        storage: Arc<dyn SessionStorage>,
        transport: Arc<dyn HttpTransport>,
        redirect: Arc<dyn LoginRedirect>,
        api_config: &ApiConfig,
    ) -> Self {
        Self {
            storage,
            transport,
            redirect,
            decoder: JwtDecoder::new(),
            refresh_path: api_config.refresh_path.clone(),
        }
    }

    /// Rehydrates the persisted session.
    ///
    /// Returns `None` and wipes every session key when the access token is
    /// missing, malformed, or expired. Never fails: storage errors also read
    /// as "no session".
    pub fn restore_session(&self) -> Option<Session> {
        let access_token = match self.storage.get(ACCESS_TOKEN_KEY) {
            Ok(Some(token)) => token,
            Ok(None) => {
                self.clear();
                return None;
            }
            Err(e) => {
                warn!(error = %e, "Cannot read access token, treating as logged out");
                return None;
            }
        };

        let claims = match self.decoder.decode(&access_token) {
            Ok(claims) => claims,
            Err(e) => {
                info!(error = %e, "Persisted access token is malformed, clearing session");
                self.clear();
                return None;
            }
        };

        if claims.is_expired_at(Utc::now().timestamp_millis()) {
            info!(exp = claims.exp, "Persisted access token expired, clearing session");
            self.clear();
            return None;
        }

        let refresh_token = self.storage.get(REFRESH_TOKEN_KEY).ok().flatten();
        let user = self
            .stored_user()
            .unwrap_or_else(|| normalize_user(&claims.to_map()));

        debug!(role = %user.role(), "Session restored");

        Some(Session {
            access_token,
            refresh_token,
            claims,
            user,
        })
    }

    /// Activates the session returned by the login endpoint.
    ///
    /// The access token's claims are overlaid with the profile fields and
    /// normalized into the user record. Tokens and snapshot are written in a
    /// single storage call; a malformed access token persists nothing.
    pub fn login(&self, response: LoginResponse) -> Result<Session, AppError> {
        let claims = self.decoder.decode(&response.access)?;
        let merged = merge(claims.to_map(), &response.user);
        let user = normalize_user(&merged);
        let snapshot = serde_json::to_string(&user)?;

        self.storage.set_many(&[
            (ACCESS_TOKEN_KEY, response.access.clone()),
            (REFRESH_TOKEN_KEY, response.refresh.clone()),
            (USER_DATA_KEY, snapshot),
        ])?;

        info!(
            user_id = ?user.id().map(|id| id.as_str()),
            role = %user.role(),
            "Login successful"
        );

        Ok(Session {
            access_token: response.access,
            refresh_token: Some(response.refresh),
            claims,
            user,
        })
    }

    /// Clears every persisted session field. Local only; no server call.
    pub fn logout(&self) -> Result<(), AppError> {
        self.storage.remove_many(&SESSION_KEYS)?;
        info!("Logged out");
        Ok(())
    }

    /// Returns the persisted access token, if any.
    pub fn current_access_token(&self) -> Option<String> {
        self.storage.get(ACCESS_TOKEN_KEY).ok().flatten()
    }

    /// Request interceptor: sets `Authorization: Bearer <token>` when a token
    /// is stored. Requests go out unchanged when logged out.
    pub fn attach_auth_header(&self, request: &mut ApiRequest) {
        if let Some(token) = self.current_access_token() {
            request.set_bearer(&token);
        }
    }

    /// Response interceptor for a 401.
    ///
    /// Performs exactly one refresh. On success the new access token is
    /// persisted, written into the request, the request is marked retried and
    /// handed to `retry`. On failure the session is wiped, the redirect
    /// collaborator fires, and an authentication error is returned so the
    /// original caller still observes the failure.
    ///
    /// A request that is already marked retried is rejected without another
    /// refresh.
    pub async fn handle_unauthorized<F, Fut>(
        &self,
        mut failed: ApiRequest,
        retry: F,
    ) -> Result<ApiResponse, AppError>
    where
        F: FnOnce(ApiRequest) -> Fut + Send,
        Fut: Future<Output = Result<ApiResponse, AppError>> + Send,
    {
        if failed.retried {
            warn!(request_id = %failed.id, path = %failed.path, "Retried request unauthorized again");
            return Err(AppError::authentication(
                "Request unauthorized after token refresh",
            ));
        }

        let access_token = match self.refresh_access_token().await {
            Ok(token) => token,
            Err(e) => {
                error!(request_id = %failed.id, error = %e, "Token refresh failed, ending session");
                self.clear();
                self.redirect.redirect_to_login();
                return Err(AppError::authentication(format!(
                    "Session expired: {}",
                    e.message
                )));
            }
        };

        failed.set_bearer(&access_token);
        failed.retried = true;
        info!(request_id = %failed.id, path = %failed.path, "Retrying request with refreshed token");
        retry(failed).await
    }

    /// Exchanges the stored refresh token for a new access token.
    async fn refresh_access_token(&self) -> Result<String, AppError> {
        let refresh = self
            .storage
            .get(REFRESH_TOKEN_KEY)?
            .ok_or_else(|| AppError::authentication("No refresh token stored"))?;

        let body = serde_json::to_value(RefreshRequest { refresh })?;
        let request = ApiRequest::post(self.refresh_path.clone(), body);

        let response = self.transport.execute(&request).await?;
        if !response.is_success() {
            return Err(AppError::authentication(format!(
                "Refresh token rejected (HTTP {})",
                response.status
            )));
        }

        let refreshed: RefreshResponse = response
            .json()
            .map_err(|e| AppError::authentication(format!("Malformed refresh response: {e}")))?;

        let claims: Claims = self.decoder.decode(&refreshed.access)?;
        debug!(exp = claims.exp, "Access token refreshed");

        let mut entries = vec![(ACCESS_TOKEN_KEY, refreshed.access.clone())];
        if let Some(rotated) = refreshed.refresh {
            entries.push((REFRESH_TOKEN_KEY, rotated));
        }
        self.storage.set_many(&entries)?;

        Ok(refreshed.access)
    }

    fn stored_user(&self) -> Option<UserRecord> {
        let raw = self.storage.get(USER_DATA_KEY).ok().flatten()?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable user snapshot");
                None
            }
        }
    }

    fn clear(&self) {
        if let Err(e) = self.storage.remove_many(&SESSION_KEYS) {
            error!(error = %e, "Failed to clear session storage");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use serde_json::json;

    use aula_core::error::ErrorKind;
    use aula_entity::user::Role;

    use super::*;
    use crate::jwt::test_support::{token_expiring_in, token_with_claims};
    use crate::storage::MemorySessionStorage;

    #[derive(Debug, Default)]
    struct ScriptedTransport {
        responses: Mutex<Vec<Result<ApiResponse, AppError>>>,
        seen: Mutex<Vec<ApiRequest>>,
    }

    impl ScriptedTransport {
        fn with(responses: Vec<Result<ApiResponse, AppError>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl HttpTransport for ScriptedTransport {
        async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, AppError> {
            self.seen.lock().unwrap().push(request.clone());
            self.responses.lock().unwrap().remove(0)
        }
    }

    #[derive(Debug, Default)]
    struct CountingRedirect(AtomicUsize);

    impl LoginRedirect for CountingRedirect {
        fn redirect_to_login(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct Fixture {
        storage: MemorySessionStorage,
        transport: Arc<ScriptedTransport>,
        redirect: Arc<CountingRedirect>,
        manager: SessionManager,
    }

    fn fixture(responses: Vec<Result<ApiResponse, AppError>>) -> Fixture {
        let storage = MemorySessionStorage::new();
        let transport = ScriptedTransport::with(responses);
        let redirect = Arc::new(CountingRedirect::default());
        let manager = SessionManager::new(
            Arc::new(storage.clone()),
            transport.clone(),
            redirect.clone(),
            &ApiConfig::default(),
        );
        Fixture {
            storage,
            transport,
            redirect,
            manager,
        }
    }

    fn login_response(access: String, user: serde_json::Value) -> LoginResponse {
        serde_json::from_value(json!({
            "acceso": access,
            "refresco": token_expiring_in(86_400),
            "usuario": user,
        }))
        .unwrap()
    }

    #[test]
    fn test_restore_without_tokens_is_none() {
        let fx = fixture(vec![]);
        assert!(fx.manager.restore_session().is_none());
    }

    #[test]
    fn test_restore_malformed_token_clears_everything() {
        let fx = fixture(vec![]);
        fx.storage
            .set_many(&[
                (ACCESS_TOKEN_KEY, "garbage".to_string()),
                (REFRESH_TOKEN_KEY, "r".to_string()),
                (USER_DATA_KEY, "{}".to_string()),
            ])
            .unwrap();

        assert!(fx.manager.restore_session().is_none());
        assert!(fx.storage.is_empty());
    }

    #[test]
    fn test_restore_expired_token_clears_everything() {
        let fx = fixture(vec![]);
        fx.storage
            .set_many(&[
                (ACCESS_TOKEN_KEY, token_expiring_in(-1)),
                (REFRESH_TOKEN_KEY, token_expiring_in(3600)),
                (USER_DATA_KEY, "{}".to_string()),
            ])
            .unwrap();

        assert!(fx.manager.restore_session().is_none());
        assert!(fx.storage.is_empty());
    }

    #[test]
    fn test_restore_prefers_user_snapshot() {
        let fx = fixture(vec![]);
        let session = fx
            .manager
            .login(login_response(
                token_expiring_in(3600),
                json!({"id": 5, "nombre": "Ana", "roles": [{"id": 1, "nombre": "Docente"}]}),
            ))
            .unwrap();

        let restored = fx.manager.restore_session().unwrap();
        assert_eq!(restored.user, session.user);
        assert_eq!(restored.user.role(), Role::Docente);
    }

    #[test]
    fn test_restore_falls_back_to_claims() {
        let fx = fixture(vec![]);
        let mut extra = serde_json::Map::new();
        extra.insert("user_id".to_string(), json!(8));
        extra.insert("is_staff".to_string(), json!(true));
        fx.storage
            .set(ACCESS_TOKEN_KEY, token_with_claims(3600, extra))
            .unwrap();

        let restored = fx.manager.restore_session().unwrap();
        assert_eq!(restored.user.id().map(|id| id.as_str()), Some("8"));
        assert!(restored.user.is_staff());
        assert!(restored.refresh_token.is_none());
    }

    // {"alg":"RS256","typ":"JWT"}.{"exp":4102444800,"user_id":3,"rol":"docente"}
    const RS256_TOKEN: &str = "eyJhbGciOiJSUzI1NiIsInR5cCI6IkpXVCJ9.\
        eyJleHAiOjQxMDI0NDQ4MDAsInVzZXJfaWQiOjMsInJvbCI6ImRvY2VudGUifQ.\
        c2lnbmF0dXJl";

    #[test]
    fn test_restore_keeps_rsa_signed_session() {
        let fx = fixture(vec![]);
        fx.storage
            .set_many(&[
                (ACCESS_TOKEN_KEY, RS256_TOKEN.to_string()),
                (REFRESH_TOKEN_KEY, "r".to_string()),
            ])
            .unwrap();

        let restored = fx.manager.restore_session().unwrap();
        assert_eq!(restored.user.id().map(|id| id.as_str()), Some("3"));
        assert_eq!(restored.user.role(), Role::Docente);
        assert_eq!(
            fx.storage.get(ACCESS_TOKEN_KEY).unwrap().as_deref(),
            Some(RS256_TOKEN)
        );
        assert_eq!(fx.storage.len(), 2);
    }

    #[test]
    fn test_login_accepts_rsa_signed_token() {
        let fx = fixture(vec![]);
        let session = fx
            .manager
            .login(login_response(RS256_TOKEN.to_string(), json!({"es_staff": true})))
            .unwrap();

        assert_eq!(session.claims.exp, 4_102_444_800);
        assert_eq!(session.user.role(), Role::Docente);
        assert!(session.user.is_staff());
        assert_eq!(fx.storage.len(), 3);
    }

    #[test]
    fn test_login_with_malformed_token_persists_nothing() {
        let fx = fixture(vec![]);
        let err = fx
            .manager
            .login(login_response("nope".to_string(), json!({})))
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
        assert!(fx.storage.is_empty());
    }

    #[test]
    fn test_logout_clears_all_keys() {
        let fx = fixture(vec![]);
        fx.manager
            .login(login_response(token_expiring_in(3600), json!({})))
            .unwrap();
        assert_eq!(fx.storage.len(), 3);

        fx.manager.logout().unwrap();
        assert!(fx.storage.is_empty());
    }

    #[test]
    fn test_attach_auth_header() {
        let fx = fixture(vec![]);
        let mut anonymous = ApiRequest::get("/api/asignaturas/");
        fx.manager.attach_auth_header(&mut anonymous);
        assert!(anonymous.bearer_token().is_none());

        fx.storage.set(ACCESS_TOKEN_KEY, "tok".to_string()).unwrap();
        let mut request = ApiRequest::get("/api/asignaturas/");
        fx.manager.attach_auth_header(&mut request);
        assert_eq!(request.bearer_token(), Some("tok"));
    }

    #[tokio::test]
    async fn test_refresh_then_retry_with_new_token() {
        let new_access = token_expiring_in(3600);
        let fx = fixture(vec![Ok(ApiResponse::new(
            200,
            json!({"acceso": new_access.clone()}),
        ))]);
        fx.manager
            .login(login_response(token_expiring_in(3600), json!({})))
            .unwrap();

        let failed = ApiRequest::get("/api/tareas/");
        let response = fx
            .manager
            .handle_unauthorized(failed, |retried| async move {
                assert!(retried.retried);
                assert_eq!(retried.bearer_token(), Some(new_access.as_str()));
                Ok::<_, AppError>(ApiResponse::new(200, json!([])))
            })
            .await
            .unwrap();
        assert_eq!(response.status, 200);

        let seen = fx.transport.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].path, ApiConfig::default().refresh_path);
        assert!(seen[0].body.as_ref().unwrap().get("refresco").is_some());
        assert!(seen[0].bearer_token().is_none());
        assert_eq!(fx.redirect.0.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_rotated_refresh_token_is_persisted() {
        let fx = fixture(vec![Ok(ApiResponse::new(
            200,
            json!({"acceso": token_expiring_in(3600), "refresco": "rotated"}),
        ))]);
        fx.manager
            .login(login_response(token_expiring_in(3600), json!({})))
            .unwrap();

        fx.manager
            .handle_unauthorized(ApiRequest::get("/x"), |_| async {
                Ok::<_, AppError>(ApiResponse::new(200, json!(null)))
            })
            .await
            .unwrap();

        assert_eq!(
            fx.storage.get(REFRESH_TOKEN_KEY).unwrap().as_deref(),
            Some("rotated")
        );
    }

    #[tokio::test]
    async fn test_network_error_during_refresh_ends_session() {
        let fx = fixture(vec![Err(AppError::network("connection refused"))]);
        fx.manager
            .login(login_response(token_expiring_in(3600), json!({})))
            .unwrap();

        let err = fx
            .manager
            .handle_unauthorized(ApiRequest::get("/api/notas/"), |_| async {
                Err::<ApiResponse, AppError>(AppError::internal("retried after failed refresh"))
            })
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::Authentication);
        for key in SESSION_KEYS {
            assert!(!fx.storage.contains(key).unwrap(), "{key}");
        }
        assert_eq!(fx.redirect.0.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_rejected_refresh_ends_session() {
        let fx = fixture(vec![Ok(ApiResponse::new(
            401,
            json!({"detail": "Token is invalid or expired"}),
        ))]);
        fx.manager
            .login(login_response(token_expiring_in(3600), json!({})))
            .unwrap();

        let result = fx
            .manager
            .handle_unauthorized(ApiRequest::get("/x"), |_| async {
                Ok::<_, AppError>(ApiResponse::new(200, json!(null)))
            })
            .await;

        assert!(result.is_err());
        assert!(fx.storage.is_empty());
        assert_eq!(fx.redirect.0.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_already_retried_request_is_not_refreshed_again() {
        let fx = fixture(vec![]);
        let mut request = ApiRequest::get("/x");
        request.retried = true;

        let err = fx
            .manager
            .handle_unauthorized(request, |_| async {
                Ok::<_, AppError>(ApiResponse::new(200, json!(null)))
            })
            .await
            .unwrap_err();

        assert!(err.is_authentication());
        assert!(fx.transport.seen.lock().unwrap().is_empty());
        assert_eq!(fx.redirect.0.load(Ordering::SeqCst), 0);
    }
}
