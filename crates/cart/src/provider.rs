//! Provider scope for the session's cart.
//!
//! The source design exposed one logical cart to a whole UI subtree through
//! an ambient context, with any access outside that scope failing loudly.
//! Here the scope is an explicit value: [`CartProvider::mount`] performs the
//! one-time hydration, and only a mounted provider hands out usable
//! [`CartStore`] handles, so "used outside provider" is unrepresentable for
//! code that goes through the provider.

use std::sync::Arc;

use crate::config::CartConfig;
use crate::error::Result;
use crate::storage::{FileBackend, MemoryBackend, StorageBackend};
use crate::store::CartStore;

/// Owner of the hydrated cart store for one session.
///
/// Pass the provider (or handles from [`cart`](Self::cart)) down the call
/// graph instead of reaching for a global.
pub struct CartProvider {
    store: CartStore,
}

impl std::fmt::Debug for CartProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartProvider").finish_non_exhaustive()
    }
}

impl CartProvider {
    /// Mount a provider over `backend`: create the store and hydrate it.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if the backend read fails, or
    /// `CartError::Corrupt` if the persisted record cannot be decoded.
    pub async fn mount(
        backend: Arc<dyn StorageBackend>,
        config: CartConfig,
    ) -> Result<Self> {
        let store = CartStore::new(backend, &config);
        store.load().await?;
        Ok(Self { store })
    }

    /// Mount with the backend implied by `config`: file-backed when
    /// `data_dir` is set, in-memory otherwise.
    ///
    /// # Errors
    ///
    /// Same as [`mount`](Self::mount).
    pub async fn mount_from_config(config: CartConfig) -> Result<Self> {
        let backend: Arc<dyn StorageBackend> = match &config.data_dir {
            Some(dir) => Arc::new(FileBackend::new(dir)),
            None => Arc::new(MemoryBackend::new()),
        };
        Self::mount(backend, config).await
    }

    /// A store handle scoped to this provider.
    #[must_use]
    pub fn cart(&self) -> CartStore {
        self.store.clone()
    }
}
