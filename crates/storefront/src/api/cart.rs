//! Server-side cart endpoints.
//!
//! Every call returns the full cart as the service now holds it, in the same
//! line-item array format used for local snapshots.

use nearwomen_core::{CartSnapshot, ProductId};
use serde::Serialize;
use tracing::instrument;

use super::{ApiClient, ApiError};

#[derive(Debug, Serialize)]
struct AddItemBody {
    product: ProductId,
    quantity: u32,
}

#[derive(Debug, Serialize)]
struct UpdateItemBody {
    quantity: u32,
}

impl ApiClient {
    /// Fetch the caller's cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn fetch_cart(&self) -> Result<CartSnapshot, ApiError> {
        let url = self.endpoint("cart")?;
        self.send_json(self.http().get(url)).await
    }

    /// Add units of a product, merging with an existing line.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn add_cart_item(
        &self,
        product: ProductId,
        quantity: u32,
    ) -> Result<CartSnapshot, ApiError> {
        let url = self.endpoint("cart/items")?;
        self.send_json(
            self.http()
                .post(url)
                .json(&AddItemBody { product, quantity }),
        )
        .await
    }

    /// Set a line's quantity.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn update_cart_item(
        &self,
        product: ProductId,
        quantity: u32,
    ) -> Result<CartSnapshot, ApiError> {
        let url = self.endpoint(&format!("cart/items/{product}"))?;
        self.send_json(self.http().put(url).json(&UpdateItemBody { quantity }))
            .await
    }

    /// Delete a line.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn delete_cart_item(&self, product: ProductId) -> Result<CartSnapshot, ApiError> {
        let url = self.endpoint(&format!("cart/items/{product}"))?;
        self.send_json(self.http().delete(url)).await
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn clear_remote_cart(&self) -> Result<(), ApiError> {
        let url = self.endpoint("cart")?;
        self.send_empty(self.http().delete(url)).await
    }
}
