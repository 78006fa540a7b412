//! Shared test helpers for client integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::{Map, Value, json};

use aula_auth::MemorySessionStorage;
use aula_auth::session::{LoginRedirect, LoginResponse};
use aula_client::ApiClient;
use aula_core::config::ApiConfig;
use aula_core::error::AppError;
use aula_core::traits::{HttpTransport, SessionStorage};
use aula_core::types::{ApiRequest, ApiResponse};

/// Transport that replays canned results and records every request.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<ApiResponse, AppError>>>,
    seen: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    /// Queue the next result.
    pub fn push(&self, result: Result<ApiResponse, AppError>) {
        self.responses.lock().unwrap().push_back(result);
    }

    /// Queue a response with the given status and body.
    pub fn respond(&self, status: u16, body: Value) {
        self.push(Ok(ApiResponse::new(status, body)));
    }

    /// Every request the transport has received so far.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, AppError> {
        self.seen.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AppError::internal("No scripted response left")))
    }
}

/// Redirect that counts how often it fired.
#[derive(Debug, Default)]
pub struct CountingRedirect(AtomicUsize);

impl CountingRedirect {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl LoginRedirect for CountingRedirect {
    fn redirect_to_login(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// A client wired to scripted collaborators.
pub struct TestClient {
    pub client: ApiClient,
    pub storage: MemorySessionStorage,
    pub transport: Arc<ScriptedTransport>,
    pub redirect: Arc<CountingRedirect>,
}

impl TestClient {
    pub fn new() -> Self {
        let storage = MemorySessionStorage::new();
        let transport = Arc::new(ScriptedTransport::default());
        let redirect = Arc::new(CountingRedirect::default());
        let client = ApiClient::new(
            &ApiConfig::default(),
            Arc::new(storage.clone()),
            transport.clone(),
            redirect.clone(),
        );
        Self {
            client,
            storage,
            transport,
            redirect,
        }
    }

    /// A client that already holds a valid session for `user`.
    pub fn logged_in(user: Value) -> Self {
        let test = Self::new();
        test.client
            .session()
            .login(login_response(token_expiring_in(3_600), user))
            .expect("login");
        test
    }

    pub fn stored(&self, key: &str) -> Option<String> {
        self.storage.get(key).unwrap()
    }
}

/// Sign a token whose `exp` is `offset_seconds` from now.
pub fn token_expiring_in(offset_seconds: i64) -> String {
    token_with_claims(offset_seconds, json!({}))
}

/// Sign a token carrying extra claims.
pub fn token_with_claims(offset_seconds: i64, extra: Value) -> String {
    let mut claims: Map<String, Value> = extra.as_object().cloned().unwrap_or_default();
    claims.insert(
        "exp".to_string(),
        json!(chrono::Utc::now().timestamp() + offset_seconds),
    );
    encode(
        &Header::default(),
        &Value::Object(claims),
        &EncodingKey::from_secret(b"backend-secret"),
    )
    .unwrap()
}

pub fn login_response(access: String, user: Value) -> LoginResponse {
    serde_json::from_value(json!({
        "acceso": access,
        "refresco": token_expiring_in(86_400),
        "usuario": user,
    }))
    .unwrap()
}
