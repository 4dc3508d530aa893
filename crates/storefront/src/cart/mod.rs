//! Cart stores.
//!
//! A deployment picks one [`CartBackend`]:
//!
//! - [`LocalCartStore`] keeps the cart on this device and writes every change
//!   through to a [`KeyValueStore`](crate::storage::KeyValueStore).
//! - [`RemoteCartStore`] keeps the cart on the order service and mirrors the
//!   service's copy after each call.
//!
//! Both expose the same narrow interface, so display code and checkout never
//! know which one they are talking to.
//!
//! # Failure semantics
//!
//! Mutations of the in-memory cart never fail. The only errors are I/O:
//! a local store that cannot save keeps the mutation in memory and returns
//! [`CartError::Persistence`]; a remote store whose call fails leaves its
//! mirror untouched and returns [`CartError::Api`]. Callers log and carry on.

mod local;
mod persistence;
mod remote;
mod view;

pub use local::LocalCartStore;
pub use persistence::CartPersistence;
pub use remote::RemoteCartStore;
pub use view::{CartItemView, CartView};

use async_trait::async_trait;
use nearwomen_core::{Cart, CartLineItem, CartSnapshot, Price, Product, ProductId};
use thiserror::Error;

use crate::api::ApiError;
use crate::storage::StorageError;

/// Errors surfaced by cart stores. All are recoverable.
#[derive(Debug, Error)]
pub enum CartError {
    /// Snapshot could not be written; the in-memory cart is still current.
    #[error("Failed to persist cart: {0}")]
    Persistence(#[from] StorageError),

    /// Snapshot could not be encoded.
    #[error("Failed to encode cart snapshot: {0}")]
    Encode(#[from] serde_json::Error),

    /// Server-backed cart call failed; the local mirror is unchanged.
    #[error("Cart service error: {0}")]
    Api(#[from] ApiError),
}

/// The operations every cart variant supports.
///
/// Mutations take `&mut self`: there is exactly one writer per cart.
#[async_trait]
pub trait CartBackend: Send + Sync {
    /// Current cart contents.
    fn cart(&self) -> &Cart;

    /// Add `quantity` units of `product`. Zero is ignored.
    async fn add_to_cart(&mut self, product: &Product, quantity: u32) -> Result<(), CartError>;

    /// Take one unit out; the line disappears when it reaches zero.
    /// Absent products are ignored.
    async fn remove_from_cart(&mut self, product_id: ProductId) -> Result<(), CartError>;

    /// Set a line's quantity; zero removes the line. Absent products are ignored.
    async fn update_quantity(
        &mut self,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<(), CartError>;

    /// Drop a whole line. Absent products are ignored.
    async fn remove_line(&mut self, product_id: ProductId) -> Result<(), CartError>;

    /// Empty the cart.
    async fn clear_cart(&mut self) -> Result<(), CartError>;

    /// Line items in display order.
    fn lines(&self) -> &[CartLineItem] {
        self.cart().lines()
    }

    /// Sum of unit price times quantity, recomputed on every call.
    fn cart_total(&self) -> Price {
        self.cart().total()
    }

    /// Sum of quantities (badge count).
    fn cart_item_count(&self) -> u64 {
        self.cart().item_count()
    }

    /// Full copy of the current state.
    fn snapshot(&self) -> CartSnapshot {
        self.cart().snapshot()
    }
}
