//! Command implementations.
//!
//! Every command that touches the cart goes through one [`AppState`], so the
//! configured backend (local file, memory, postgres or remote) is honoured
//! uniformly.

pub mod cart;
pub mod checkout;
pub mod migrate;
pub mod products;

use nearwomen_core::{Product, ProductId};
use nearwomen_storefront::api::ApiError;
use nearwomen_storefront::config::StorefrontConfig;
use nearwomen_storefront::error::StorefrontError;
use nearwomen_storefront::state::AppState;

/// Build application state from configuration.
pub async fn open_state(config: StorefrontConfig) -> Result<AppState, StorefrontError> {
    AppState::new(config).await
}

/// Find a product in the built-in catalog, falling back to the order service.
pub async fn resolve_product(state: &AppState, id: ProductId) -> Result<Product, StorefrontError> {
    if let Some(product) = state.catalog().find(id) {
        return Ok(product.clone());
    }
    match state.api().get_product(id).await {
        Ok(product) => Ok(product),
        Err(ApiError::Api { status: 404, .. }) => {
            Err(StorefrontError::NotFound(format!("Product {id}")))
        }
        Err(e) => Err(e.into()),
    }
}
