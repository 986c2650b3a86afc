//! The cart store: authoritative in-memory state plus a durable mirror.
//!
//! Every mutation is an atomic read-modify-write on the latest cart state,
//! taken under one lock. The source design this replaces computed "next
//! state" from a snapshot captured at call time, so two back-to-back
//! mutations could both work from the same stale base and one would
//! overwrite the other in storage; committing under the lock removes that
//! lost-update hazard outright.
//!
//! Persistence is fire-and-forget: a background writer observes committed
//! snapshots and mirrors the newest one to the backend. Mutators never wait
//! on storage, and a failed write is logged and swallowed.

use std::sync::Arc;

use tokio::sync::{Mutex, watch};
use tracing::{debug, error, info, instrument, warn};

use pocket_market_core::{Cart, Product, ProductId};

use crate::config::CartConfig;
use crate::error::{CartError, Result};
use crate::storage::StorageBackend;

/// Handle to the session's cart.
///
/// Cheaply cloneable; all clones share one cart. Obtain a hydrated handle
/// through [`CartProvider`](crate::provider::CartProvider), or call
/// [`load`](Self::load) once on a fresh store. Every operation except `load`
/// fails with [`CartError::UsedOutsideProvider`] until hydration succeeds.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    backend: Arc<dyn StorageBackend>,
    storage_key: String,
    /// `None` until `load` succeeds. Holding hydration state inside the lock
    /// makes "mutation before load" observable at the single commit point.
    state: Mutex<Option<Cart>>,
    /// Committed snapshots, in commit order. The background writer and any
    /// UI subscribers hang off this channel.
    publish: watch::Sender<Cart>,
}

impl CartStore {
    /// Create an un-hydrated store over `backend`.
    #[must_use]
    pub fn new(backend: Arc<dyn StorageBackend>, config: &CartConfig) -> Self {
        let (publish, _) = watch::channel(Cart::new());
        Self {
            inner: Arc::new(StoreInner {
                backend,
                storage_key: config.storage_key.clone(),
                state: Mutex::new(None),
                publish,
            }),
        }
    }

    /// Hydrate the cart from storage. Once per store lifetime.
    ///
    /// An absent record leaves the cart empty. On success this also starts
    /// the background writer that mirrors committed snapshots back to
    /// storage.
    ///
    /// # Errors
    ///
    /// - `CartError::AlreadyLoaded` if the store is already hydrated.
    /// - `CartError::Storage` if the backend read fails.
    /// - `CartError::Corrupt` if the record cannot be decoded. The cart is
    ///   not silently reset: the caller decides whether to fall back to an
    ///   empty backend or surface the failure.
    #[instrument(skip(self))]
    pub async fn load(&self) -> Result<()> {
        let mut state = self.inner.state.lock().await;
        if state.is_some() {
            return Err(CartError::AlreadyLoaded);
        }

        let record = self.inner.backend.get(&self.inner.storage_key).await?;
        let cart: Cart = match record {
            Some(payload) => serde_json::from_str(&payload).map_err(|e| {
                error!(key = %self.inner.storage_key, error = %e, "corrupt cart record");
                CartError::Corrupt(e)
            })?,
            None => Cart::new(),
        };

        info!(items = cart.len(), "cart hydrated from storage");
        self.inner.publish.send_replace(cart.clone());
        *state = Some(cart);
        self.spawn_writer();
        Ok(())
    }

    /// Append a new line item for `product` with quantity 1.
    ///
    /// Duplicate ids are not merged; adding the same product twice yields
    /// two entries.
    ///
    /// # Errors
    ///
    /// Returns `CartError::UsedOutsideProvider` if the store is not hydrated.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub async fn add_to_cart(&self, product: Product) -> Result<()> {
        self.commit(move |cart| {
            cart.add(product);
            true
        })
        .await?;
        Ok(())
    }

    /// Increase the quantity of the item with `id` by one.
    ///
    /// A no-op if no such item exists.
    ///
    /// # Errors
    ///
    /// Returns `CartError::UsedOutsideProvider` if the store is not hydrated.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn increment(&self, id: &ProductId) -> Result<()> {
        let changed = self.commit(|cart| cart.increment(id)).await?;
        if !changed {
            debug!("increment for id not in cart; no-op");
        }
        Ok(())
    }

    /// Decrease the quantity of the item with `id` by one, removing the
    /// item entirely when its quantity reaches zero.
    ///
    /// A no-op if no such item exists.
    ///
    /// # Errors
    ///
    /// Returns `CartError::UsedOutsideProvider` if the store is not hydrated.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn decrement(&self, id: &ProductId) -> Result<()> {
        let changed = self.commit(|cart| cart.decrement(id)).await?;
        if !changed {
            debug!("decrement for id not in cart; no-op");
        }
        Ok(())
    }

    /// Snapshot of the current cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::UsedOutsideProvider` if the store is not hydrated.
    pub async fn items(&self) -> Result<Cart> {
        let state = self.inner.state.lock().await;
        state.clone().ok_or(CartError::UsedOutsideProvider)
    }

    /// Subscribe to committed cart snapshots.
    ///
    /// The receiver starts at the current snapshot and is woken on each
    /// commit; a slow consumer sees the latest committed snapshot, not
    /// every intermediate one (watch-channel semantics).
    ///
    /// # Errors
    ///
    /// Returns `CartError::UsedOutsideProvider` if the store is not hydrated.
    pub async fn subscribe(&self) -> Result<watch::Receiver<Cart>> {
        let state = self.inner.state.lock().await;
        if state.is_none() {
            return Err(CartError::UsedOutsideProvider);
        }
        Ok(self.inner.publish.subscribe())
    }

    /// Apply one transition to the latest cart state and publish the result.
    ///
    /// The lock spans read, transition, and publish, so concurrent mutators
    /// serialize instead of racing a shared stale snapshot. Returns whether
    /// the transition changed the cart; unchanged carts are not re-published
    /// or re-persisted.
    async fn commit(
        &self,
        transition: impl FnOnce(&mut Cart) -> bool,
    ) -> Result<bool> {
        let mut state = self.inner.state.lock().await;
        let cart = state.as_mut().ok_or(CartError::UsedOutsideProvider)?;

        let changed = transition(cart);
        if changed {
            self.inner.publish.send_replace(cart.clone());
        }
        Ok(changed)
    }

    /// Spawn the background task that mirrors committed snapshots to storage.
    ///
    /// Whole-value, last-write-wins: the task always serializes the newest
    /// snapshot, so bursts of mutations coalesce into fewer writes and a
    /// slow backend can never reorder the record backwards. The task exits
    /// when the last store handle is dropped.
    fn spawn_writer(&self) {
        let mut updates = self.inner.publish.subscribe();
        // The hydrated state came from storage; don't immediately write it back.
        updates.mark_unchanged();
        let backend = Arc::clone(&self.inner.backend);
        let key = self.inner.storage_key.clone();

        tokio::spawn(async move {
            while updates.changed().await.is_ok() {
                let payload = serde_json::to_string(&*updates.borrow_and_update());
                match payload {
                    Ok(payload) => {
                        if let Err(error) = backend.set(&key, &payload).await {
                            warn!(%key, %error, "cart write failed; in-memory state stays authoritative");
                        }
                    }
                    Err(error) => error!(%key, %error, "failed to encode cart record"),
                }
            }
            debug!(%key, "cart persistence task stopped");
        });
    }
}
