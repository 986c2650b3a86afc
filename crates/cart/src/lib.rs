//! Pocket Market Cart - client-side cart state container.
//!
//! This crate owns the authoritative in-memory cart for a storefront
//! session and keeps a durable key-value mirror approximately in sync.
//!
//! # Architecture
//!
//! - [`CartProvider`] performs the one-time hydration from storage and hands
//!   out [`CartStore`] handles; it replaces the ambient provider scope of a
//!   UI context with explicit dependency injection.
//! - [`CartStore`] applies every mutation as an atomic read-modify-write on
//!   the latest cart state and publishes each committed snapshot to
//!   subscribers.
//! - A background writer mirrors the always-latest snapshot to the
//!   [`StorageBackend`] (whole-value, fire-and-forget, last-write-wins).
//!
//! # Consistency
//!
//! Mutations take effect on observers synchronously; the durable write races
//! independently and is never awaited by the caller. A failed write is
//! logged and swallowed, leaving in-memory state authoritative until the
//! next successful write.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod provider;
pub mod storage;
pub mod store;

pub use config::{CartConfig, ConfigError, DEFAULT_STORAGE_KEY};
pub use error::CartError;
pub use provider::CartProvider;
pub use storage::{FileBackend, MemoryBackend, StorageBackend, StorageError};
pub use store::CartStore;

pub use pocket_market_core::{Cart, LineItem, Product, ProductId};
