//! # aula-core
//!
//! Core crate for the Aula academic client. Contains the storage and
//! transport traits, configuration schemas, typed identifiers, the
//! outbound request model, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Aula crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
