//! Core types for Pocket Market.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod id;
pub mod item;

pub use cart::Cart;
pub use id::*;
pub use item::{LineItem, Product};
