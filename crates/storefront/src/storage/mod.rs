//! Key-value storage adapters.
//!
//! The cart persists a single JSON snapshot under one storage key. The
//! [`KeyValueStore`] trait is the contract every backing store implements;
//! serialization lives in [`crate::cart::CartPersistence`], not here.
//!
//! # Implementations
//!
//! - [`FileStore`] - one file per key inside a data directory
//! - [`MemoryStore`] - in-process map, used by tests and ephemeral sessions
//! - `PgStore` - `PostgreSQL` table (requires the `postgres` feature)

mod file;
mod memory;
#[cfg(feature = "postgres")]
mod postgres;

pub use file::FileStore;
pub use memory::MemoryStore;
#[cfg(feature = "postgres")]
pub use postgres::PgStore;

use async_trait::async_trait;
use thiserror::Error;

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Database operation failed.
    #[cfg(feature = "postgres")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Key is not usable by this backend.
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    /// Backend cannot be reached.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Asynchronous string key-value storage.
///
/// Values are stored and returned whole; there are no partial updates.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, or `None` if the key is unset.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Deleting an unset key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

#[async_trait]
impl<T: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<T> {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key).await
    }
}
