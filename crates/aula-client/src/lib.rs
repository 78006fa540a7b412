//! # aula-client
//!
//! HTTP client for the Aula backend with the session interceptors wired in:
//! bearer token on every request, one refresh-and-retry on 401.

pub mod client;
pub mod transport;

pub use client::ApiClient;
pub use transport::ReqwestTransport;
