//! Product listings.

use std::sync::Arc;

use nearwomen_core::{Product, ProductId};
use tracing::{debug, instrument};

use super::{ApiClient, ApiError};

const ALL_PRODUCTS_KEY: &str = "products:all";

impl ApiClient {
    /// List every product. Cached for 5 minutes.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a product list.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Arc<Vec<Product>>, ApiError> {
        if let Some(products) = self.inner.products.get(ALL_PRODUCTS_KEY).await {
            debug!("Product list served from cache");
            return Ok(products);
        }

        let url = self.endpoint("products")?;
        let products: Vec<Product> = self.send_json(self.http().get(url)).await?;
        let products = Arc::new(products);

        self.inner
            .products
            .insert(ALL_PRODUCTS_KEY.to_string(), Arc::clone(&products))
            .await;

        Ok(products)
    }

    /// Fetch one product.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails; a missing product surfaces as
    /// `ApiError::Api { status: 404, .. }`.
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: ProductId) -> Result<Product, ApiError> {
        let url = self.endpoint(&format!("products/{id}"))?;
        self.send_json(self.http().get(url)).await
    }

    /// Server-side search by name or description. Not cached.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn search_products(&self, term: &str) -> Result<Vec<Product>, ApiError> {
        let mut url = self.endpoint("products/search/")?;
        url.path_segments_mut()
            .map_err(|()| ApiError::Config("base URL cannot have path segments".to_string()))?
            .pop_if_empty()
            .push(term);
        self.send_json(self.http().get(url)).await
    }

    /// Drop cached product listings.
    pub async fn invalidate_products(&self) {
        self.inner.products.invalidate(ALL_PRODUCTS_KEY).await;
    }
}
