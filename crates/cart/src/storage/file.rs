//! File-backed storage: one file per key under a base directory.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;

use super::{StorageBackend, StorageError};

/// Key-value storage backed by the local filesystem.
///
/// Each key maps to `<base>/<key>.json`. Writes go through a temporary file
/// and a rename, so a record is either the previous value or the new one,
/// never a torn write.
pub struct FileBackend {
    base_path: PathBuf,
}

impl FileBackend {
    /// Create a file backend rooted at `base_path`.
    ///
    /// The directory is created lazily on first write.
    #[must_use]
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn key_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        Self::validate_key(key)?;
        Ok(self.base_path.join(format!("{key}.json")))
    }

    /// Validate that a key is safe for use as a filename.
    /// Rejects path separators, `..`, and control characters.
    fn validate_key(key: &str) -> Result<(), StorageError> {
        if key.is_empty()
            || key.contains('/')
            || key.contains('\\')
            || key.contains("..")
            || key.chars().any(char::is_control)
        {
            return Err(StorageError::InvalidKey(key.to_owned()));
        }
        Ok(())
    }
}

#[async_trait]
impl StorageBackend for FileBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.key_path(key)?;
        match fs::read_to_string(&path).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.key_path(key)?;
        fs::create_dir_all(&self.base_path).await?;

        let tmp = self.base_path.join(format!("{key}.json.tmp"));
        fs::write(&tmp, value).await?;
        fs::rename(&tmp, &path).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_absent_key_is_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let backend = FileBackend::new(dir.path());
        assert!(backend.get("cart").await.expect("get").is_none());
    }

    #[tokio::test]
    async fn test_set_then_get_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let backend = FileBackend::new(dir.path());

        backend.set("storefront:cart", "[]").await.expect("set");
        assert_eq!(
            backend.get("storefront:cart").await.expect("get").as_deref(),
            Some("[]")
        );
    }

    #[tokio::test]
    async fn test_value_survives_backend_recreation() {
        let dir = tempfile::tempdir().expect("tempdir");
        {
            let backend = FileBackend::new(dir.path());
            backend.set("cart", "{\"v\":1}").await.expect("set");
        }

        let backend = FileBackend::new(dir.path());
        assert_eq!(
            backend.get("cart").await.expect("get").as_deref(),
            Some("{\"v\":1}")
        );
    }

    #[tokio::test]
    async fn test_path_traversal_keys_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let backend = FileBackend::new(dir.path());

        for key in ["", "../escape", "a/b", "a\\b", "nul\0byte"] {
            let err = backend.set(key, "x").await.unwrap_err();
            assert!(matches!(err, StorageError::InvalidKey(_)), "key {key:?}");
        }
    }

    #[tokio::test]
    async fn test_no_tmp_file_left_behind() {
        let dir = tempfile::tempdir().expect("tempdir");
        let backend = FileBackend::new(dir.path());
        backend.set("cart", "[]").await.expect("set");

        let mut entries = fs::read_dir(dir.path()).await.expect("read_dir");
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await.expect("entry") {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        assert_eq!(names, ["cart.json"]);
    }
}
