//! Outbound HTTP transport trait.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::http::{ApiRequest, ApiResponse};

/// Executes a single request against the backend.
///
/// Any HTTP status, including 4xx/5xx, is returned as `Ok(ApiResponse)`.
/// `Err` is reserved for requests that produced no response at all
/// (connection refused, timeout, unreadable body).
#[async_trait]
pub trait HttpTransport: Send + Sync + std::fmt::Debug + 'static {
    /// Send the request and return whatever the backend answered.
    async fn execute(&self, request: &ApiRequest) -> AppResult<ApiResponse>;
}
