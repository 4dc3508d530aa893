//! NearWomen storefront library.
//!
//! Cart state for the storefront: the cart stores and their persistence,
//! the order service client, checkout and the product catalog. Display
//! layers (the `nw` CLI, app shells) drive everything through
//! [`state::AppState`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod state;
pub mod storage;
