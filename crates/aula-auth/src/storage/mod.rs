//! Durable session storage backends.

pub mod file;
pub mod memory;

use std::path::PathBuf;
use std::sync::Arc;

use aula_core::config::{StorageBackend, StorageConfig};
use aula_core::error::AppError;
use aula_core::traits::SessionStorage;

pub use file::FileSessionStorage;
pub use memory::MemorySessionStorage;

/// Opens the backend selected by configuration.
pub fn open(config: &StorageConfig) -> Result<Arc<dyn SessionStorage>, AppError> {
    match config.backend {
        StorageBackend::Memory => Ok(Arc::new(MemorySessionStorage::new())),
        StorageBackend::File => {
            let path = if config.path.is_empty() {
                FileSessionStorage::default_path()
            } else {
                PathBuf::from(&config.path)
            };
            Ok(Arc::new(FileSessionStorage::open(path)?))
        }
    }
}
