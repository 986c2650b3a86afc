//! Product descriptors and cart line items.
//!
//! A [`Product`] is what the catalog hands to the cart: identity, display
//! fields, and a unit price, but no quantity. A [`LineItem`] is one cart
//! entry: the same fields plus the quantity held in the cart.
//!
//! Both types serialize with camelCase field names, and `unit_price` as a
//! plain JSON number. The persisted cart record is an array of line items in
//! exactly this shape, so the field names here are the storage format.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// A product descriptor, as handed to the cart by the catalog.
///
/// Carries no quantity: quantity is a property of the cart entry, not of the
/// product itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Stable unique identifier, immutable once added to a cart.
    pub id: ProductId,
    /// Display name.
    pub title: String,
    /// Display asset reference.
    pub image_url: String,
    /// Currency amount for a single unit, immutable once added to a cart.
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
}

/// One product entry in the cart.
///
/// Invariant: `quantity >= 1` for as long as the item exists in a [`Cart`];
/// an item whose quantity would drop to zero is removed from the cart
/// entirely rather than kept as a zero-quantity record.
///
/// [`Cart`]: super::cart::Cart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Stable unique identifier, immutable once added.
    pub id: ProductId,
    /// Display name.
    pub title: String,
    /// Display asset reference.
    pub image_url: String,
    /// Currency amount for a single unit.
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    /// Units of this product in the cart.
    pub quantity: u32,
}

impl LineItem {
    /// Total price for this line (`unit_price` × `quantity`).
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

impl From<Product> for LineItem {
    /// A freshly added product enters the cart with quantity 1.
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            title: product.title,
            image_url: product.image_url,
            unit_price: product.unit_price,
            quantity: 1,
        }
    }
}
