//! JWT claim decoding for tokens issued by the backend.

pub mod claims;
pub mod decoder;

pub use claims::Claims;
pub use decoder::JwtDecoder;
