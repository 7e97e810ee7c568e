//! Key-value storage interface and implementations
//!
//! This module defines the interface the ranking store persists through, with
//! in-memory, file-backed and recording implementations.

use crate::error::{RankingError, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::debug;

/// Trait for durable string storage keyed by name
pub trait StorageProvider: Send + Sync {
    /// Get the value stored under `key`, if any
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing what was there
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// In-memory storage implementation
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    values: RwLock<HashMap<String, String>>,
}

impl InMemoryStorage {
    /// Create a new empty in-memory storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.values.read().map(|values| values.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StorageProvider for InMemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self.values.read().map_err(|_| RankingError::InternalError {
            message: "Failed to acquire storage read lock".to_string(),
        })?;

        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self.values.write().map_err(|_| RankingError::InternalError {
            message: "Failed to acquire storage write lock".to_string(),
        })?;

        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// File-backed storage: each key is a `<key>.json` file under one directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    directory: PathBuf,
}

impl FileStorage {
    /// Create a file storage rooted at `directory`; the directory is created on first write
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            && !key.starts_with('.');
        if !valid {
            return Err(RankingError::Storage {
                message: format!("Invalid storage key: {:?}", key),
            }
            .into());
        }

        Ok(self.directory.join(format!("{}.json", key)))
    }
}

impl StorageProvider for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;

        match std::fs::read_to_string(&path) {
            Ok(value) => {
                debug!("Read key '{}' from {}", key, path.display());
                Ok(Some(value))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(RankingError::Storage {
                message: format!("Failed to read {}: {}", path.display(), e),
            }
            .into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;

        std::fs::create_dir_all(&self.directory).map_err(|e| RankingError::Storage {
            message: format!(
                "Failed to create storage directory {}: {}",
                self.directory.display(),
                e
            ),
        })?;

        // Readers only ever see a complete file
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value).map_err(|e| RankingError::Storage {
            message: format!("Failed to write {}: {}", tmp.display(), e),
        })?;
        std::fs::rename(&tmp, &path).map_err(|e| RankingError::Storage {
            message: format!("Failed to replace {}: {}", path.display(), e),
        })?;

        debug!("Wrote key '{}' to {}", key, path.display());
        Ok(())
    }
}

/// Mock storage for testing
#[derive(Debug, Default)]
pub struct MockStorage {
    values: RwLock<HashMap<String, String>>,
    set_calls: RwLock<Vec<(String, String)>>,
    fail_writes: RwLock<bool>,
}

impl MockStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all set calls made (for testing)
    pub fn get_set_calls(&self) -> Vec<(String, String)> {
        self.set_calls
            .read()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    /// Clear set calls (for testing)
    pub fn clear_set_calls(&self) {
        if let Ok(mut calls) = self.set_calls.write() {
            calls.clear();
        }
    }

    /// Preset a stored value for testing
    pub fn preset(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self.values.write().map_err(|_| RankingError::InternalError {
            message: "Failed to acquire storage write lock".to_string(),
        })?;

        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    /// Make every subsequent `set` fail
    pub fn fail_writes(&self, fail: bool) {
        if let Ok(mut flag) = self.fail_writes.write() {
            *flag = fail;
        }
    }
}

impl StorageProvider for MockStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self.values.read().map_err(|_| RankingError::InternalError {
            message: "Failed to acquire storage read lock".to_string(),
        })?;

        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes.read().map(|flag| *flag).unwrap_or(false) {
            return Err(RankingError::Storage {
                message: "Mock storage write failure".to_string(),
            }
            .into());
        }

        // Record the call for testing
        if let Ok(mut calls) = self.set_calls.write() {
            calls.push((key.to_string(), value.to_string()));
        }

        let mut values = self.values.write().map_err(|_| RankingError::InternalError {
            message: "Failed to acquire storage write lock".to_string(),
        })?;

        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_in_memory_storage_basic_operations() {
        let storage = InMemoryStorage::new();

        // Initially nothing stored
        assert!(storage.get("rankings").unwrap().is_none());
        assert!(storage.is_empty());

        storage.set("rankings", "[]").unwrap();
        assert_eq!(storage.get("rankings").unwrap().as_deref(), Some("[]"));

        // Overwrite replaces
        storage.set("rankings", "[1]").unwrap();
        assert_eq!(storage.get("rankings").unwrap().as_deref(), Some("[1]"));
        assert_eq!(storage.len(), 1);
    }

    #[test]
    fn test_file_storage_round_trip() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path().join("nested"));

        assert!(storage.get("rankings").unwrap().is_none());

        storage.set("rankings", r#"[{"a":1}]"#).unwrap();
        assert_eq!(
            storage.get("rankings").unwrap().as_deref(),
            Some(r#"[{"a":1}]"#)
        );
        assert!(dir.path().join("nested").join("rankings.json").exists());
        assert!(!dir.path().join("nested").join("rankings.json.tmp").exists());
    }

    #[test]
    fn test_file_storage_rejects_path_like_keys() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path());

        assert!(storage.set("../escape", "x").is_err());
        assert!(storage.set("", "x").is_err());
        assert!(storage.get("a/b").is_err());
    }

    #[test]
    fn test_mock_storage_records_calls() {
        let storage = MockStorage::new();
        storage.set("rankings", "[]").unwrap();

        let calls = storage.get_set_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "rankings");

        storage.clear_set_calls();
        assert!(storage.get_set_calls().is_empty());
    }

    #[test]
    fn test_mock_storage_write_failure() {
        let storage = MockStorage::new();
        storage.fail_writes(true);

        assert!(storage.set("rankings", "[]").is_err());
        assert!(storage.get("rankings").unwrap().is_none());
        assert!(storage.get_set_calls().is_empty());
    }
}
