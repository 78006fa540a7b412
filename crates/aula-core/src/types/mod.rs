//! Core type definitions used across the Aula workspace.

pub mod http;
pub mod id;

pub use http::{ApiRequest, ApiResponse, HttpMethod};
pub use id::*;
