//! Key-value storage backends for the cart record.
//!
//! The cart is mirrored to storage as a single whole-value record: the
//! backend contract is `get`/`set` of one serialized string per key, with no
//! partial updates. Two adapters are provided:
//!
//! - [`MemoryBackend`] - process-local map, for tests and ephemeral sessions
//! - [`FileBackend`] - one file per key under a base directory, surviving
//!   process restarts

use async_trait::async_trait;
use thiserror::Error;

mod file;
mod memory;

pub use file::FileBackend;
pub use memory::MemoryBackend;

/// Errors surfaced by storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The key is not usable by this backend.
    #[error("invalid storage key {0:?}")]
    InvalidKey(String),

    /// Backend-specific failure.
    #[error("backend error: {0}")]
    Backend(String),
}

/// Whole-value key-value storage.
///
/// Implementations must be safe to share across tasks; the cart's background
/// writer holds the backend for the lifetime of the store.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Read the value previously stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read. An absent key
    /// is `Ok(None)`, not an error.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Durably store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value could not be stored.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}
