//! NearWomen Core - Shared types library.
//!
//! This crate provides the domain types used across all NearWomen components:
//! - `storefront` - Cart stores, persistence adapters, checkout and catalog
//! - `cli` - Command-line front end that drives the cart
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no storage,
//! no HTTP clients. Every cart operation here is synchronous and total, so the
//! storefront crate can layer persistence and remote backends on top.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, categories, products and order statuses
//! - [`cart`] - The in-memory cart and its persisted snapshot format

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod types;

pub use cart::{Cart, CartLineItem, CartSnapshot};
pub use types::*;
