//! In-memory storage for testing and ephemeral sessions.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{StorageBackend, StorageError};

/// In-memory key-value storage.
///
/// Values live only as long as the backend; carts "persisted" here do not
/// survive the process. Useful for tests and for sessions that opt out of
/// durable storage.
#[derive(Default)]
pub struct MemoryBackend {
    entries: RwLock<HashMap<String, String>>,
    fail_writes: AtomicBool,
}

impl MemoryBackend {
    /// Create a new in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `set` fail with a backend error.
    ///
    /// Test hook for exercising the write-failure path; reads are not
    /// affected.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl StorageBackend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.read().await;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Backend("write failure injected".to_owned()));
        }
        let mut entries = self.entries.write().await;
        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}
