//! Durable key/value storage for the client session.

use crate::result::AppResult;

/// Trait for session storage backends (in-memory or on-disk).
///
/// Values are opaque strings. Multi-key writes and removals must be applied
/// atomically: a reader never observes only part of a `set_many` or
/// `remove_many` call.
pub trait SessionStorage: Send + Sync + std::fmt::Debug + 'static {
    /// Get a value by key. Returns `None` if the key is absent.
    fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Write several keys in one step.
    fn set_many(&self, entries: &[(&str, String)]) -> AppResult<()>;

    /// Remove several keys in one step. Absent keys are ignored.
    fn remove_many(&self, keys: &[&str]) -> AppResult<()>;

    /// Write a single key.
    fn set(&self, key: &str, value: String) -> AppResult<()> {
        self.set_many(&[(key, value)])
    }

    /// Check whether a key is present.
    fn contains(&self, key: &str) -> AppResult<bool> {
        Ok(self.get(key)?.is_some())
    }
}
