//! Pocket Market Core - Shared types library.
//!
//! This crate provides the domain types consumed by the other Pocket Market
//! crates, notably `pocket-market-cart` (the cart state container).
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access, no
//! runtime. This keeps it lightweight and allows it to be used anywhere,
//! including in pure state-transition tests.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, product descriptors, line items, and the cart
//!   collection with its mutation rules

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
