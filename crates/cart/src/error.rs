//! Unified error handling for the cart container.
//!
//! Operations on [`CartStore`](crate::store::CartStore) return
//! `Result<T, CartError>`. Background persistence failures are deliberately
//! absent from this taxonomy: the writer logs and swallows them, and
//! in-memory state stays authoritative.

use thiserror::Error;

use crate::storage::StorageError;

/// Cart container error type.
#[derive(Debug, Error)]
pub enum CartError {
    /// A cart operation was invoked before hydration completed.
    ///
    /// This is a programming error in the caller: every consumer must go
    /// through a mounted [`CartProvider`](crate::provider::CartProvider)
    /// (or call [`CartStore::load`](crate::store::CartStore::load) itself)
    /// before touching the cart.
    #[error("cart used outside an active provider: mount a CartProvider before invoking cart operations")]
    UsedOutsideProvider,

    /// `load` was invoked on a store that is already hydrated.
    #[error("cart already loaded: load is once per store lifetime")]
    AlreadyLoaded,

    /// The persisted cart record could not be decoded.
    #[error("corrupt cart record: {0}")]
    Corrupt(#[from] serde_json::Error),

    /// The storage backend failed while reading the cart record.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Result type alias for `CartError`.
pub type Result<T> = std::result::Result<T, CartError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_error_display() {
        let err = CartError::UsedOutsideProvider;
        assert!(err.to_string().contains("outside an active provider"));

        let err = CartError::AlreadyLoaded;
        assert!(err.to_string().contains("already loaded"));

        let err = CartError::Storage(StorageError::Backend("disk full".to_owned()));
        assert_eq!(err.to_string(), "storage error: backend error: disk full");
    }

    #[test]
    fn test_corrupt_from_serde_json() {
        let parse_err = serde_json::from_str::<Vec<u32>>("not json").unwrap_err();
        let err = CartError::from(parse_err);
        assert!(matches!(err, CartError::Corrupt(_)));
    }
}
