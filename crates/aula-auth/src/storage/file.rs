//! File-based session storage.
//!
//! Keys are kept in a single JSON object on disk:
//!
//! ```json
//! {
//!   "accessToken": "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...",
//!   "refreshToken": "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...",
//!   "userData": "{\"id\":\"7\",\"display_name\":\"Ana\",...}"
//! }
//! ```
//!
//! Every mutation rewrites the whole document through a sibling temp file
//! and a rename, so readers see either the old or the new document. On Unix
//! the file is created with mode 0600.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use tracing::{debug, warn};

use aula_core::error::AppError;
use aula_core::result::AppResult;
use aula_core::traits::SessionStorage;

/// Session storage persisted to a JSON file.
#[derive(Debug)]
pub struct FileSessionStorage {
    /// Path to the session file.
    file_path: PathBuf,
    /// In-memory copy of the file contents.
    cache: Mutex<BTreeMap<String, String>>,
}

impl FileSessionStorage {
    /// Default session file path
    /// - Linux/macOS: `~/.config/aula/session.json`
    /// - Windows: `%APPDATA%\aula\session.json`
    pub fn default_path() -> PathBuf {
        if let Some(config_dir) = dirs::config_dir() {
            config_dir.join("aula").join("session.json")
        } else if let Some(home_dir) = dirs::home_dir() {
            home_dir.join(".aula").join("session.json")
        } else {
            PathBuf::from(".aula").join("session.json")
        }
    }

    /// Opens (or lazily creates) the store at `file_path`.
    ///
    /// An unreadable or corrupt file is treated as empty; the next write
    /// replaces it.
    pub fn open(file_path: impl Into<PathBuf>) -> AppResult<Self> {
        let file_path = file_path.into();
        let cache = load_from_disk(&file_path);
        Ok(Self {
            file_path,
            cache: Mutex::new(cache),
        })
    }

    fn lock(&self) -> AppResult<MutexGuard<'_, BTreeMap<String, String>>> {
        self.cache
            .lock()
            .map_err(|_| AppError::storage("Session storage lock poisoned"))
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> AppResult<()> {
        if let Some(parent) = self.file_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let contents = serde_json::to_string_pretty(entries)?;
        let tmp_path = self.file_path.with_extension("json.tmp");
        fs::write(&tmp_path, contents)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&tmp_path, fs::Permissions::from_mode(0o600))?;
        }

        fs::rename(&tmp_path, &self.file_path).map_err(|e| {
            AppError::with_source(
                aula_core::error::ErrorKind::Storage,
                format!(
                    "Failed to replace session file {}: {e}",
                    self.file_path.display()
                ),
                e,
            )
        })?;

        debug!(path = %self.file_path.display(), keys = entries.len(), "Session file written");
        Ok(())
    }
}

fn load_from_disk(path: &Path) -> BTreeMap<String, String> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return BTreeMap::new(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Cannot read session file, starting empty");
            return BTreeMap::new();
        }
    };

    serde_json::from_str(&contents).unwrap_or_else(|e| {
        warn!(path = %path.display(), error = %e, "Corrupt session file, starting empty");
        BTreeMap::new()
    })
}

impl SessionStorage for FileSessionStorage {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set_many(&self, entries: &[(&str, String)]) -> AppResult<()> {
        let mut cache = self.lock()?;
        let mut next = cache.clone();
        for (key, value) in entries {
            next.insert((*key).to_string(), value.clone());
        }
        self.persist(&next)?;
        *cache = next;
        Ok(())
    }

    fn remove_many(&self, keys: &[&str]) -> AppResult<()> {
        let mut cache = self.lock()?;
        if !keys.iter().any(|key| cache.contains_key(*key)) {
            return Ok(());
        }
        let mut next = cache.clone();
        for key in keys {
            next.remove(*key);
        }
        self.persist(&next)?;
        *cache = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let storage = FileSessionStorage::open(&path).unwrap();
        storage
            .set_many(&[
                ("accessToken", "a".to_string()),
                ("refreshToken", "r".to_string()),
            ])
            .unwrap();

        let reopened = FileSessionStorage::open(&path).unwrap();
        assert_eq!(reopened.get("accessToken").unwrap(), Some("a".to_string()));
        assert_eq!(reopened.get("refreshToken").unwrap(), Some("r".to_string()));
    }

    #[test]
    fn test_remove_many_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let storage = FileSessionStorage::open(&path).unwrap();
        storage.set("accessToken", "a".to_string()).unwrap();
        storage.remove_many(&["accessToken", "userData"]).unwrap();

        let reopened = FileSessionStorage::open(&path).unwrap();
        assert_eq!(reopened.get("accessToken").unwrap(), None);
    }

    #[test]
    fn test_corrupt_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{not json").unwrap();

        let storage = FileSessionStorage::open(&path).unwrap();
        assert_eq!(storage.get("accessToken").unwrap(), None);

        storage.set("accessToken", "fresh".to_string()).unwrap();
        let reopened = FileSessionStorage::open(&path).unwrap();
        assert_eq!(reopened.get("accessToken").unwrap(), Some("fresh".to_string()));
    }

    #[cfg(unix)]
    #[test]
    fn test_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let storage = FileSessionStorage::open(&path).unwrap();
        storage.set("accessToken", "a".to_string()).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
