//! Core traits defined in `aula-core` and implemented by other crates.

pub mod storage;
pub mod transport;

pub use storage::SessionStorage;
pub use transport::HttpTransport;
