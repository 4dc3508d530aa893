//! Cart snapshot persistence.

use nearwomen_core::{Cart, CartSnapshot};
use tracing::{debug, instrument, warn};

use super::CartError;
use crate::storage::KeyValueStore;

/// Binds a [`KeyValueStore`] to the storage key holding the cart snapshot.
#[derive(Debug, Clone)]
pub struct CartPersistence<K> {
    store: K,
    key: String,
}

impl<K: KeyValueStore> CartPersistence<K> {
    #[must_use]
    pub fn new(store: K, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Storage key the snapshot is kept under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Underlying store.
    #[must_use]
    pub const fn store(&self) -> &K {
        &self.store
    }

    /// Read the stored cart.
    ///
    /// Never fails: a missing key, an unreadable store or a payload that does
    /// not parse all yield an empty cart. A negative price anywhere in the
    /// payload counts as corrupt.
    #[instrument(skip(self), fields(key = %self.key))]
    pub async fn load(&self) -> Cart {
        let raw = match self.store.get(&self.key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No stored cart, starting empty");
                return Cart::new();
            }
            Err(e) => {
                warn!(error = %e, "Failed to read stored cart, starting empty");
                return Cart::new();
            }
        };

        match serde_json::from_str::<CartSnapshot>(&raw) {
            Ok(snapshot) => {
                let cart = Cart::from_snapshot(snapshot);
                debug!(lines = cart.len(), "Stored cart loaded");
                cart
            }
            Err(e) => {
                warn!(error = %e, "Stored cart is corrupt, starting empty");
                Cart::new()
            }
        }
    }

    /// Replace the stored snapshot with `cart`.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Persistence` if the store rejects the write.
    #[instrument(skip(self, cart), fields(key = %self.key, lines = cart.len()))]
    pub async fn save(&self, cart: &Cart) -> Result<(), CartError> {
        let payload = serde_json::to_string(&cart.snapshot())?;
        self.store.set(&self.key, &payload).await?;
        Ok(())
    }
}
