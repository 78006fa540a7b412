//! Durable session storage configuration.

use serde::{Deserialize, Serialize};

/// Which backend holds the persisted session keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// Process-local map; the session dies with the process.
    Memory,
    /// JSON document on disk.
    File,
}

impl Default for StorageBackend {
    fn default() -> Self {
        Self::File
    }
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackend::Memory => write!(f, "memory"),
            StorageBackend::File => write!(f, "file"),
        }
    }
}

/// Session storage configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Storage backend.
    #[serde(default)]
    pub backend: StorageBackend,
    /// Path of the session file. Empty means the platform config directory.
    #[serde(default)]
    pub path: String,
}
