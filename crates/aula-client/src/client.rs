//! Authenticated API client.
//!
//! Every request passes through two interceptors: the session's bearer token
//! is attached on the way out, and a 401 on the way back triggers a single
//! refresh-and-retry through [`SessionManager::handle_unauthorized`].

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info};

use aula_auth::session::{LoginRedirect, LoginRequest, LoginResponse, Session, SessionManager};
use aula_auth::storage;
use aula_core::config::{ApiConfig, AppConfig};
use aula_core::error::AppError;
use aula_core::traits::{HttpTransport, SessionStorage};
use aula_core::types::{ApiRequest, ApiResponse};

use crate::transport::ReqwestTransport;

/// HTTP client bound to a session.
#[derive(Debug, Clone)]
pub struct ApiClient {
    /// Transport used for every call.
    transport: Arc<dyn HttpTransport>,
    /// Token lifecycle.
    session: SessionManager,
    /// Endpoint configuration.
    config: ApiConfig,
}

impl ApiClient {
    /// Creates a client from explicit collaborators.
    pub fn new(
        config: &ApiConfig,
        storage: Arc<dyn SessionStorage>,
        transport: Arc<dyn HttpTransport>,
        redirect: Arc<dyn LoginRedirect>,
    ) -> Self {
        let session = SessionManager::new(storage, Arc::clone(&transport), redirect, config);
        Self {
            transport,
            session,
            config: config.clone(),
        }
    }

    /// Creates a client backed by `reqwest` and the configured storage.
    pub fn from_config(config: &AppConfig, redirect: Arc<dyn LoginRedirect>) -> Result<Self, AppError> {
        let storage = storage::open(&config.storage)?;
        let transport: Arc<dyn HttpTransport> = Arc::new(ReqwestTransport::new(&config.api)?);
        Ok(Self::new(&config.api, storage, transport, redirect))
    }

    /// Returns the session manager.
    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    /// Rehydrates the persisted session, if it is still valid.
    pub fn restore_session(&self) -> Option<Session> {
        self.session.restore_session()
    }

    /// Exchanges credentials at the login endpoint and activates the session.
    ///
    /// The login call carries no bearer token and is not subject to the
    /// refresh interceptor; a 401 here means bad credentials.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<Session, AppError> {
        let body = serde_json::to_value(LoginRequest { username, password })?;
        let request = ApiRequest::post(self.config.login_path.clone(), body);
        debug!(request_id = %request.id, username = %username, "Authenticating");

        let response = self.transport.execute(&request).await?.error_for_status()?;
        let login: LoginResponse = response
            .json()
            .map_err(|e| AppError::authentication(format!("Malformed login response: {e}")))?;

        self.session.login(login)
    }

    /// Ends the session locally.
    pub fn logout(&self) -> Result<(), AppError> {
        self.session.logout()
    }

    /// Sends a request through the auth interceptors.
    ///
    /// Non-2xx responses are converted into errors after the 401 handling has
    /// had its chance to recover.
    pub async fn send(&self, mut request: ApiRequest) -> Result<ApiResponse, AppError> {
        self.session.attach_auth_header(&mut request);
        debug!(
            request_id = %request.id,
            method = %request.method,
            path = %request.path,
            authorized = request.bearer_token().is_some(),
            "Sending request"
        );

        let response = self.transport.execute(&request).await?;
        if !response.is_unauthorized() {
            return response.error_for_status();
        }

        info!(request_id = %request.id, path = %request.path, "Request unauthorized");
        let transport = Arc::clone(&self.transport);
        let retried = self
            .session
            .handle_unauthorized(request, move |retry| async move {
                transport.execute(&retry).await
            })
            .await?;

        retried.error_for_status()
    }

    /// GET `path`.
    pub async fn get(&self, path: &str) -> Result<ApiResponse, AppError> {
        self.send(ApiRequest::get(path)).await
    }

    /// GET `path` and deserialize the body.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, AppError> {
        self.get(path).await?.json()
    }

    /// POST a JSON body to `path`.
    pub async fn post(&self, path: &str, body: Value) -> Result<ApiResponse, AppError> {
        self.send(ApiRequest::post(path, body)).await
    }
}
