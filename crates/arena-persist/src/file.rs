//! File-based storage backend
//!
//! Stores each value as a pretty-printed JSON file named `<key>.json` inside a
//! single directory. Keys are restricted to a safe file-name alphabet so a key
//! can never address a path outside that directory.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::backend::{StorageBackend, StorageError};

const EXTENSION: &str = "json";

/// Directory of JSON files, one per key
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    /// Use `dir` as the store; it is created on first write
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.{EXTENSION}")))
    }
}

/// Keys become file names: ASCII letters, digits, `-` and `_` only
fn validate_key(key: &str) -> Result<(), StorageError> {
    if key.is_empty() {
        return Err(StorageError::InvalidKey("key must not be empty".to_string()));
    }
    if key.contains("..") {
        return Err(StorageError::InvalidKey(format!(
            "path traversal detected in '{key}'"
        )));
    }
    if !key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(StorageError::InvalidKey(format!(
            "'{key}' may only contain letters, digits, '-' and '_'"
        )));
    }
    Ok(())
}

#[async_trait]
impl StorageBackend for FileBackend {
    fn name(&self) -> &str {
        "file"
    }

    async fn is_healthy(&self) -> bool {
        match fs::metadata(&self.dir).await {
            Ok(meta) => meta.is_dir() && !meta.permissions().readonly(),
            // Not created yet; the first write creates it
            Err(e) => e.kind() == std::io::ErrorKind::NotFound,
        }
    }

    async fn set_value(&self, key: &str, value: serde_json::Value) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let bytes = serde_json::to_vec_pretty(&value)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        fs::create_dir_all(&self.dir).await?;

        // Write then rename so a crash never leaves a truncated file behind
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, bytes).await?;
        fs::rename(&tmp, &path).await?;

        tracing::debug!(key, path = %path.display(), "Stored value");
        Ok(())
    }

    async fn get_value(&self, key: &str) -> Result<Option<serde_json::Value>, StorageError> {
        let path = self.path_for(key)?;
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let value = serde_json::from_slice(&bytes)
            .map_err(|e| StorageError::Serialization(format!("{}: {}", path.display(), e)))?;
        Ok(Some(value))
    }

    async fn delete(&self, key: &str) -> Result<bool, StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        let path = self.path_for(key)?;
        Ok(fs::try_exists(&path).await?)
    }

    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut keys = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if stem.starts_with(prefix) && validate_key(stem).is_ok() {
                    keys.push(stem.to_string());
                }
            }
        }

        keys.sort();
        Ok(keys)
    }
}

/// Write any serializable value to `path` as pretty JSON
pub async fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), StorageError> {
    let bytes =
        serde_json::to_vec_pretty(value).map_err(|e| StorageError::Serialization(e.to_string()))?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }
    fs::write(path, bytes).await?;
    Ok(())
}

/// Read a JSON document written by [`write_json`]
pub async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, StorageError> {
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(StorageError::NotFound(path.display().to_string()))
        }
        Err(e) => return Err(e.into()),
    };
    serde_json::from_slice(&bytes)
        .map_err(|e| StorageError::Serialization(format!("{}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::StorageExt;

    #[test]
    fn test_key_validation() {
        assert!(validate_key("session-1234_abc").is_ok());
        assert!(validate_key("").is_err());
        assert!(validate_key("..").is_err());
        assert!(validate_key("../etc/passwd").is_err());
        assert!(validate_key("a/b").is_err());
        assert!(validate_key("a\\b").is_err());
        assert!(validate_key("spaced key").is_err());
    }

    #[tokio::test]
    async fn test_file_backend_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::new(dir.path().join("store"));

        assert!(backend.is_healthy().await);
        assert!(backend.list_keys("").await.unwrap().is_empty());
        assert_eq!(backend.get::<u32>("missing").await.unwrap(), None);

        backend.set("b-2", &2u32).await.unwrap();
        backend.set("a-1", &1u32).await.unwrap();
        backend.set("other", &3u32).await.unwrap();

        assert_eq!(backend.get::<u32>("a-1").await.unwrap(), Some(1));
        assert_eq!(backend.list_keys("").await.unwrap(), vec!["a-1", "b-2", "other"]);
        assert_eq!(backend.list_keys("a-").await.unwrap(), vec!["a-1"]);

        backend.set("a-1", &10u32).await.unwrap();
        assert_eq!(backend.get::<u32>("a-1").await.unwrap(), Some(10));

        assert!(backend.delete("a-1").await.unwrap());
        assert!(!backend.delete("a-1").await.unwrap());
        assert!(!backend.exists("a-1").await.unwrap());
    }

    #[tokio::test]
    async fn test_traversal_key_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::new(dir.path());

        let result = backend.set("../escape", &1u32).await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }

    #[tokio::test]
    async fn test_corrupt_file_is_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.json"), b"{not json").unwrap();
        let backend = FileBackend::new(dir.path());

        assert!(matches!(
            backend.get_value("bad").await,
            Err(StorageError::Serialization(_))
        ));
    }

    #[tokio::test]
    async fn test_write_and_read_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("doc.json");

        write_json(&path, &vec!["left", "right"]).await.unwrap();
        let back: Vec<String> = read_json(&path).await.unwrap();
        assert_eq!(back, vec!["left", "right"]);

        let missing = read_json::<Vec<String>>(&dir.path().join("nope.json")).await;
        assert!(matches!(missing, Err(StorageError::NotFound(_))));
    }
}
