//! The cart collection and its mutation rules.
//!
//! [`Cart`] owns the ordered list of line items and is the single place
//! where the quantity rules live: items enter with quantity 1, increment
//! and decrement touch exactly one entry, and an entry whose quantity would
//! reach zero is removed outright. Callers that hold a `Cart` behind a lock
//! get atomic read-modify-write transitions for free by calling these
//! methods under the lock.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::item::{LineItem, Product};

/// The ordered collection of line items for one session.
///
/// Serializes transparently as a JSON array of line items; this is the
/// whole-value record written to storage.
///
/// Invariant: no entry with quantity ≤ 0 is ever retained.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Number of distinct line items (not units).
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no line items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The line items in display order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Iterate over the line items in display order.
    pub fn iter(&self) -> impl Iterator<Item = &LineItem> {
        self.items.iter()
    }

    /// First line item with the given id, if any.
    ///
    /// "First" matters: the cart does not merge duplicate ids (see
    /// [`Self::add`]), so more than one entry may share an id.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&LineItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Total number of units across all line items.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Sum of `unit_price` × `quantity` over all line items.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(LineItem::line_total).sum()
    }

    /// Append a new line item for `product` with quantity 1.
    ///
    /// No uniqueness constraint: adding a product whose id is already in the
    /// cart appends a second entry rather than merging quantities. The
    /// storefront relies on this matching the stored record exactly, so the
    /// cart reproduces it rather than deduplicating.
    pub fn add(&mut self, product: Product) {
        self.items.push(LineItem::from(product));
        self.check_invariant();
    }

    /// Increase the quantity of the first item with `id` by one.
    ///
    /// Returns `false` (and leaves the cart untouched) if no item has that
    /// id. The item keeps its position in display order.
    pub fn increment(&mut self, id: &ProductId) -> bool {
        let Some(item) = self.items.iter_mut().find(|item| &item.id == id) else {
            return false;
        };
        item.quantity += 1;
        self.check_invariant();
        true
    }

    /// Decrease the quantity of the first item with `id` by one.
    ///
    /// An item at quantity 1 is removed from the cart entirely. Returns
    /// `false` (and leaves the cart untouched) if no item has that id.
    pub fn decrement(&mut self, id: &ProductId) -> bool {
        let Some(position) = self.items.iter().position(|item| &item.id == id) else {
            return false;
        };
        let Some(item) = self.items.get_mut(position) else {
            return false;
        };
        if item.quantity <= 1 {
            self.items.remove(position);
        } else {
            item.quantity -= 1;
        }
        self.check_invariant();
        true
    }

    fn check_invariant(&self) {
        debug_assert!(
            self.items.iter().all(|item| item.quantity >= 1),
            "cart must never retain an entry with quantity <= 0"
        );
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a LineItem;
    type IntoIter = std::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl From<Vec<LineItem>> for Cart {
    fn from(items: Vec<LineItem>) -> Self {
        Self { items }
    }
}
