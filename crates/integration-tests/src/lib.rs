//! Integration tests for Pocket Market.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p pocket-market-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_semantics` - Operation sequences checked against a reference model
//! - `cart_persistence` - Round-trips through the durable mirror, including
//!   file-backed restarts
//!
//! This library holds the shared test support: a deliberately dumb
//! reference cart model and a helper that waits for the fire-and-forget
//! mirror to catch up with in-memory state.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::time::Duration;

use rust_decimal::Decimal;

use pocket_market_cart::{CartStore, StorageBackend};
use pocket_market_core::{Cart, Product, ProductId};

/// A cart operation, as issued by a UI.
#[derive(Debug, Clone)]
pub enum CartOp {
    Add(Product),
    Increment(ProductId),
    Decrement(ProductId),
}

/// Reference model of the cart semantics: an ordered list of
/// `(id, quantity)` pairs mutated with the plainest possible code.
///
/// The real store must agree with this model for every operation sequence.
#[derive(Debug, Default)]
pub struct ReferenceCart {
    entries: Vec<(ProductId, u32)>,
}

impl ReferenceCart {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one operation: add appends with quantity 1 (duplicates and
    /// all), increment/decrement touch the first matching entry, absent ids
    /// are no-ops, and quantity 1 decrements to removal.
    pub fn apply(&mut self, op: &CartOp) {
        match op {
            CartOp::Add(product) => self.entries.push((product.id.clone(), 1)),
            CartOp::Increment(id) => {
                if let Some(entry) = self.entries.iter_mut().find(|(eid, _)| eid == id) {
                    entry.1 += 1;
                }
            }
            CartOp::Decrement(id) => {
                if let Some(pos) = self.entries.iter().position(|(eid, _)| eid == id) {
                    if let Some(entry) = self.entries.get_mut(pos) {
                        if entry.1 <= 1 {
                            self.entries.remove(pos);
                        } else {
                            entry.1 -= 1;
                        }
                    }
                }
            }
        }
    }

    /// The ids and quantities currently in the model, in order.
    #[must_use]
    pub fn entries(&self) -> &[(ProductId, u32)] {
        &self.entries
    }
}

/// Drive `op` through the real store.
///
/// # Panics
///
/// Panics if the store rejects the operation; sequence tests run entirely
/// inside a mounted provider, where no operation has an error case.
pub async fn apply_to_store(store: &CartStore, op: &CartOp) {
    match op {
        CartOp::Add(product) => store.add_to_cart(product.clone()).await.expect("add"),
        CartOp::Increment(id) => store.increment(id).await.expect("increment"),
        CartOp::Decrement(id) => store.decrement(id).await.expect("decrement"),
    }
}

/// A product fixture with a price derived from its id.
#[must_use]
pub fn product(id: &str, price_cents: i64) -> Product {
    Product {
        id: ProductId::new(id),
        title: format!("Product {id}"),
        image_url: format!("https://cdn.example.com/{id}.png"),
        unit_price: Decimal::new(price_cents, 2),
    }
}

/// Poll the backend until the record under `key` decodes to `expected`.
///
/// Persistence is fire-and-forget by design, so tests observe the mirror by
/// waiting for it to converge rather than awaiting any particular write.
///
/// # Panics
///
/// Panics if the backend has not converged after a few seconds.
pub async fn wait_for_persisted(backend: &dyn StorageBackend, key: &str, expected: &Cart) {
    for _ in 0..300 {
        if let Some(payload) = backend.get(key).await.expect("backend read") {
            let stored: Cart = serde_json::from_str(&payload).expect("stored record decodes");
            if &stored == expected {
                return;
            }
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("backend never converged to the in-memory cart");
}
