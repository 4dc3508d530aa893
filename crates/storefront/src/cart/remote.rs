//! Server-backed cart.

use async_trait::async_trait;
use nearwomen_core::{Cart, CartSnapshot, Product, ProductId};
use tracing::{debug, instrument};

use super::{CartBackend, CartError};
use crate::api::ApiClient;

/// Cart held by the order service.
///
/// Keeps a mirror of the last cart the service returned. Each operation makes
/// one call and replaces the mirror with the response; a failed call leaves
/// the mirror as it was. Decisions that depend on the current quantity
/// (decrement versus delete) are made against the mirror.
#[derive(Debug)]
pub struct RemoteCartStore {
    client: ApiClient,
    mirror: Cart,
}

impl RemoteCartStore {
    /// Fetch the service's cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Api` if the cart cannot be fetched.
    pub async fn connect(client: ApiClient) -> Result<Self, CartError> {
        let snapshot = client.fetch_cart().await?;
        Ok(Self {
            client,
            mirror: Cart::from_snapshot(snapshot),
        })
    }

    /// Re-read the service's cart, discarding the mirror.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Api` if the cart cannot be fetched.
    pub async fn refresh(&mut self) -> Result<(), CartError> {
        let snapshot = self.client.fetch_cart().await?;
        self.replace(snapshot);
        Ok(())
    }

    fn replace(&mut self, snapshot: CartSnapshot) {
        self.mirror = Cart::from_snapshot(snapshot);
        debug!(lines = self.mirror.len(), "Cart mirror updated");
    }
}

#[async_trait]
impl CartBackend for RemoteCartStore {
    fn cart(&self) -> &Cart {
        &self.mirror
    }

    #[instrument(skip(self, product), fields(product_id = %product.id))]
    async fn add_to_cart(&mut self, product: &Product, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            tracing::warn!("Ignoring add with non-positive quantity");
            return Ok(());
        }
        let snapshot = self.client.add_cart_item(product.id, quantity).await?;
        self.replace(snapshot);
        Ok(())
    }

    #[instrument(skip(self))]
    async fn remove_from_cart(&mut self, product_id: ProductId) -> Result<(), CartError> {
        let Some(line) = self.mirror.get(product_id) else {
            return Ok(());
        };
        let snapshot = if line.quantity > 1 {
            let quantity = line.quantity - 1;
            self.client.update_cart_item(product_id, quantity).await?
        } else {
            self.client.delete_cart_item(product_id).await?
        };
        self.replace(snapshot);
        Ok(())
    }

    #[instrument(skip(self))]
    async fn update_quantity(
        &mut self,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<(), CartError> {
        let Some(line) = self.mirror.get(product_id) else {
            return Ok(());
        };
        if line.quantity == quantity {
            return Ok(());
        }
        let snapshot = if quantity == 0 {
            self.client.delete_cart_item(product_id).await?
        } else {
            self.client.update_cart_item(product_id, quantity).await?
        };
        self.replace(snapshot);
        Ok(())
    }

    #[instrument(skip(self))]
    async fn remove_line(&mut self, product_id: ProductId) -> Result<(), CartError> {
        if self.mirror.get(product_id).is_none() {
            return Ok(());
        }
        let snapshot = self.client.delete_cart_item(product_id).await?;
        self.replace(snapshot);
        Ok(())
    }

    #[instrument(skip(self))]
    async fn clear_cart(&mut self) -> Result<(), CartError> {
        self.client.clear_remote_cart().await?;
        self.mirror.clear();
        Ok(())
    }
}
