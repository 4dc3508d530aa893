//! Device-local cart with write-through persistence.

use async_trait::async_trait;
use nearwomen_core::{Cart, Product, ProductId};
use tracing::{debug, instrument, warn};

use super::{CartBackend, CartError, CartPersistence};
use crate::storage::KeyValueStore;

/// The in-memory cart plus its persistence.
///
/// Loaded once by [`LocalCartStore::open`]; every change that alters the cart
/// is saved immediately. Operations that change nothing (unknown product,
/// zero quantity) do not touch storage.
#[derive(Debug)]
pub struct LocalCartStore<K> {
    cart: Cart,
    persistence: CartPersistence<K>,
}

impl<K: KeyValueStore> LocalCartStore<K> {
    /// Hydrate from storage, falling back to an empty cart.
    pub async fn open(persistence: CartPersistence<K>) -> Self {
        let cart = persistence.load().await;
        Self { cart, persistence }
    }

    /// Wrap an already-loaded cart without reading storage.
    #[must_use]
    pub const fn with_cart(cart: Cart, persistence: CartPersistence<K>) -> Self {
        Self { cart, persistence }
    }

    #[must_use]
    pub const fn persistence(&self) -> &CartPersistence<K> {
        &self.persistence
    }

    /// Save after a change. The in-memory cart stays authoritative on failure.
    async fn write_through(&self, operation: &'static str) -> Result<(), CartError> {
        if let Err(e) = self.persistence.save(&self.cart).await {
            warn!(operation, error = %e, "Cart change kept in memory but not persisted");
            return Err(e);
        }
        debug!(operation, lines = self.cart.len(), "Cart persisted");
        Ok(())
    }
}

#[async_trait]
impl<K: KeyValueStore> CartBackend for LocalCartStore<K> {
    fn cart(&self) -> &Cart {
        &self.cart
    }

    #[instrument(skip(self, product), fields(product_id = %product.id))]
    async fn add_to_cart(&mut self, product: &Product, quantity: u32) -> Result<(), CartError> {
        if !self.cart.add(product, quantity) {
            warn!(quantity, "Ignoring add with non-positive quantity");
            return Ok(());
        }
        self.write_through("add").await
    }

    #[instrument(skip(self))]
    async fn remove_from_cart(&mut self, product_id: ProductId) -> Result<(), CartError> {
        if !self.cart.remove_one(product_id) {
            debug!("Product not in cart, nothing to remove");
            return Ok(());
        }
        self.write_through("remove").await
    }

    #[instrument(skip(self))]
    async fn update_quantity(
        &mut self,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<(), CartError> {
        if !self.cart.set_quantity(product_id, quantity) {
            return Ok(());
        }
        self.write_through("update").await
    }

    #[instrument(skip(self))]
    async fn remove_line(&mut self, product_id: ProductId) -> Result<(), CartError> {
        if self.cart.remove_line(product_id).is_none() {
            return Ok(());
        }
        self.write_through("remove_line").await
    }

    #[instrument(skip(self))]
    async fn clear_cart(&mut self) -> Result<(), CartError> {
        self.cart.clear();
        self.write_through("clear").await
    }
}
