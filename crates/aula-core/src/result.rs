//! Convenience result type alias for Aula.

use crate::error::AppError;

/// A specialized `Result` type for Aula operations.
pub type AppResult<T> = Result<T, AppError>;
