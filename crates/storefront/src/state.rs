//! Application state shared across the storefront.

use std::sync::Arc;

use nearwomen_core::UserId;
use tokio::sync::{Mutex, MutexGuard};
use tracing::info;

use crate::api::{ApiClient, OrderReceipt};
use crate::cart::{CartBackend, CartPersistence, LocalCartStore, RemoteCartStore};
use crate::catalog::Catalog;
use crate::checkout::{Checkout, CheckoutError, ShippingDetails};
use crate::config::{CartBackendKind, CartConfig, StorageKind, StorefrontConfig};
use crate::error::StorefrontError;
use crate::storage::{FileStore, KeyValueStore, MemoryStore};

/// Application state shared across all callers.
///
/// This struct is cheaply cloneable via `Arc` and owns the one cart for
/// this session. Cart access is serialized through an async mutex.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    api: ApiClient,
    catalog: Catalog,
    cart: Mutex<Box<dyn CartBackend>>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.inner.config)
            .field("api", &self.inner.api)
            .field("catalog", &self.inner.catalog.len())
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Build state from configuration, opening the configured cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the API client cannot be built, the storage
    /// backend cannot be opened, or a remote cart cannot be fetched.
    pub async fn new(config: StorefrontConfig) -> Result<Self, StorefrontError> {
        let api = ApiClient::new(&config.api)?;
        let cart = open_cart(&config.cart, &api).await?;
        Ok(Self::from_parts(config, api, Catalog::builtin(), cart))
    }

    /// Assemble state from already-built parts.
    #[must_use]
    pub fn from_parts(
        config: StorefrontConfig,
        api: ApiClient,
        catalog: Catalog,
        cart: Box<dyn CartBackend>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                api,
                catalog,
                cart: Mutex::new(cart),
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the order service client.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// Get a reference to the built-in catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Lock the cart for reading or mutation.
    pub async fn cart(&self) -> MutexGuard<'_, Box<dyn CartBackend>> {
        self.inner.cart.lock().await
    }

    /// Fetch the live product listing from the order service.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::Api` if the listing cannot be fetched.
    pub async fn remote_catalog(&self) -> Result<Catalog, StorefrontError> {
        let products = self.inner.api.list_products().await?;
        Ok(Catalog::from_products(products))
    }

    /// Place an order for the current cart through the order service.
    ///
    /// # Errors
    ///
    /// See [`Checkout::submit`].
    pub async fn checkout(
        &self,
        buyer: &UserId,
        shipping: &ShippingDetails,
    ) -> Result<OrderReceipt, CheckoutError> {
        let mut cart = self.cart().await;
        Checkout::new(self.inner.api.clone())
            .submit(&mut **cart, buyer, shipping)
            .await
    }
}

/// Open the cart backend selected by configuration.
///
/// # Errors
///
/// Returns an error if the selected backend cannot be reached.
pub async fn open_cart(
    config: &CartConfig,
    api: &ApiClient,
) -> Result<Box<dyn CartBackend>, StorefrontError> {
    info!(backend = ?config.backend, storage = ?config.storage, "Opening cart");

    if config.backend == CartBackendKind::Remote {
        let store = RemoteCartStore::connect(api.clone()).await?;
        return Ok(Box::new(store));
    }

    match config.storage {
        StorageKind::File => Ok(open_local(FileStore::new(config.data_dir.clone()), config).await),
        StorageKind::Memory => Ok(open_local(MemoryStore::new(), config).await),
        StorageKind::Postgres => open_postgres(config).await,
    }
}

async fn open_local<K>(store: K, config: &CartConfig) -> Box<dyn CartBackend>
where
    K: KeyValueStore + 'static,
{
    let persistence = CartPersistence::new(store, config.storage_key.clone());
    Box::new(LocalCartStore::open(persistence).await)
}

#[cfg(feature = "postgres")]
async fn open_postgres(config: &CartConfig) -> Result<Box<dyn CartBackend>, StorefrontError> {
    use crate::config::ConfigError;
    use crate::storage::PgStore;

    let url = config
        .database_url
        .as_ref()
        .ok_or_else(|| ConfigError::MissingEnvVar("NEARWOMEN_DATABASE_URL".to_string()))?;
    let store = PgStore::connect(url).await?;
    store.migrate().await?;
    Ok(open_local(store, config).await)
}

#[cfg(not(feature = "postgres"))]
#[allow(clippy::unused_async)]
async fn open_postgres(_config: &CartConfig) -> Result<Box<dyn CartBackend>, StorefrontError> {
    Err(crate::config::ConfigError::InvalidEnvVar(
        "NEARWOMEN_CART_STORAGE".to_string(),
        "postgres storage requires the `postgres` feature".to_string(),
    )
    .into())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use nearwomen_core::ProductId;

    use super::*;
    use crate::config::ApiConfig;

    fn config(storage: StorageKind, data_dir: &std::path::Path) -> StorefrontConfig {
        StorefrontConfig {
            api: ApiConfig::for_url("http://127.0.0.1:9/api").unwrap(),
            cart: CartConfig {
                storage,
                data_dir: data_dir.to_path_buf(),
                ..CartConfig::default()
            },
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    #[tokio::test]
    async fn test_file_backed_cart_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let yoga_mat = ProductId::new(13);

        {
            let state = AppState::new(config(StorageKind::File, dir.path()))
                .await
                .unwrap();
            let product = state.catalog().find(yoga_mat).unwrap().clone();
            state.cart().await.add_to_cart(&product, 2).await.unwrap();
        }

        let state = AppState::new(config(StorageKind::File, dir.path()))
            .await
            .unwrap();
        let cart = state.cart().await;
        assert_eq!(cart.cart_item_count(), 2);
        assert_eq!(cart.cart_total().to_string(), "$79.98");
    }

    #[tokio::test]
    async fn test_memory_cart_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::new(config(StorageKind::Memory, dir.path()))
            .await
            .unwrap();
        assert!(state.cart().await.lines().is_empty());
        assert_eq!(state.catalog().len(), 16);
    }

    #[cfg(not(feature = "postgres"))]
    #[tokio::test]
    async fn test_postgres_requires_feature() {
        let dir = tempfile::tempdir().unwrap();
        let result = AppState::new(config(StorageKind::Postgres, dir.path())).await;
        assert!(matches!(result, Err(StorefrontError::Config(_))));
    }

    #[tokio::test]
    async fn test_checkout_with_empty_cart_is_rejected_locally() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::new(config(StorageKind::Memory, dir.path()))
            .await
            .unwrap();
        let result = state
            .checkout(&UserId::new("u-1"), &ShippingDetails::default())
            .await;
        assert!(matches!(result, Err(CheckoutError::EmptyCart)));
    }
}
