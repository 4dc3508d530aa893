//! Core types for NearWomen.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod category;
pub mod id;
pub mod price;
pub mod product;
pub mod status;

pub use category::{Category, CategoryError};
pub use id::*;
pub use price::{CurrencyCode, Price, PriceError};
pub use product::Product;
pub use status::OrderStatus;
