//! `reqwest`-backed implementation of [`HttpTransport`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use tracing::debug;

use aula_core::config::ApiConfig;
use aula_core::error::{AppError, ErrorKind};
use aula_core::traits::HttpTransport;
use aula_core::types::{ApiRequest, ApiResponse, HttpMethod};

/// Sends requests to the configured backend over HTTP.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    /// Shared connection pool.
    client: reqwest::Client,
    /// Base URL without a trailing slash.
    base_url: String,
}

impl ReqwestTransport {
    /// Creates a transport from the API configuration.
    pub fn new(config: &ApiConfig) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Cannot build HTTP client", e)
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Joins a request path onto the base URL. Absolute URLs pass through.
    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

fn method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, AppError> {
        let url = self.url_for(&request.path);
        let mut builder = self.client.request(method(request.method), &url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            AppError::with_source(ErrorKind::Network, format!("{} {} failed", request.method, url), e)
        })?;

        let status = response.status().as_u16();
        let bytes = response.bytes().await.map_err(|e| {
            AppError::with_source(ErrorKind::Network, "Failed to read response body", e)
        })?;

        // Empty or non-JSON bodies (HTML error pages, 204) read as Null.
        let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);

        debug!(request_id = %request.id, status, "Response received");
        Ok(ApiResponse::new(status, body))
    }
}
