//! `nw migrate`
//!
//! Creates the `cart_snapshots` table used by `postgres` cart storage.
//!
//! # Environment Variables
//!
//! - `NEARWOMEN_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string

use nearwomen_storefront::config::{ConfigError, StorefrontConfig};
use nearwomen_storefront::error::StorefrontError;
use nearwomen_storefront::storage::PgStore;
use tracing::info;

/// Run the cart snapshot migrations.
pub async fn run(config: &StorefrontConfig) -> Result<(), StorefrontError> {
    let database_url = config
        .cart
        .database_url
        .as_ref()
        .ok_or_else(|| ConfigError::MissingEnvVar("NEARWOMEN_DATABASE_URL".to_string()))?;

    info!("Connecting to cart database...");
    let store = PgStore::connect(database_url).await?;

    info!("Running cart migrations...");
    store.migrate().await?;

    info!("Cart migrations complete!");
    Ok(())
}
