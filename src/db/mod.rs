//! Durable key-value persistence
//!
//! The preference profile lives here as a single serialized value. Backends
//! are pluggable so a host can choose between an in-process map, a directory
//! of JSON files and Redis.

use std::sync::Arc;

use crate::{
    config::{Config, StorageBackend},
    error::AppResult,
};

pub mod file;
pub mod memory;
pub mod redis;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use self::redis::{create_redis_client, RedisStore};

/// Trait for durable key-value backends
///
/// Every failure is reported as `AppError::StorageUnavailable`. A missing key
/// is not a failure: `get` returns `None`.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Replaces the value stored under `key`
    async fn set(&self, key: &str, value: &str) -> AppResult<()>;

    /// Removes `key`; removing an absent key succeeds
    async fn remove(&self, key: &str) -> AppResult<()>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}

/// Builds the backend selected in configuration
pub fn create_store(config: &Config) -> anyhow::Result<Arc<dyn KeyValueStore>> {
    let store: Arc<dyn KeyValueStore> = match config.storage_backend {
        StorageBackend::Memory => Arc::new(MemoryStore::new()),
        StorageBackend::File => Arc::new(FileStore::new(&config.preferences_dir)),
        StorageBackend::Redis => Arc::new(RedisStore::new(create_redis_client(&config.redis_url)?)),
    };

    tracing::info!(backend = store.name(), "Preference storage ready");

    Ok(store)
}
