use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::storage::errors::StorageError;
use crate::storage::types::CachePrefix;

/// Process-local store. Suitable for tests and single-instance development.
pub struct InMemoryCacheStore {
    pub(super) entry: Mutex<HashMap<String, (String, Instant)>>,
}

/// Store shared by every instance through one Redis server.
pub struct RedisCacheStore {
    pub(super) conn: redis::aio::MultiplexedConnection,
}

/// Key-value store with per-key expiry.
///
/// Every operation touches a single key; no ordering is promised across keys.
#[async_trait]
pub trait CacheStore: Send + Sync + 'static {
    /// Verify the backing store is reachable.
    async fn init(&self) -> Result<(), StorageError>;

    /// Store `value` under `prefix:key`, replacing any previous value. `ttl` is in seconds and must be positive.
    async fn put_with_ttl(
        &self,
        prefix: CachePrefix,
        key: &str,
        value: &str,
        ttl: u64,
    ) -> Result<(), StorageError>;

    /// Read the value, or `None` if absent or expired.
    async fn get(&self, prefix: CachePrefix, key: &str) -> Result<Option<String>, StorageError>;

    /// Delete the key. Deleting a missing key is not an error.
    async fn remove(&self, prefix: CachePrefix, key: &str) -> Result<(), StorageError>;

    /// Atomically read and delete the key.
    ///
    /// Of any number of concurrent callers, at most one receives `Some`.
    async fn take(&self, prefix: CachePrefix, key: &str) -> Result<Option<String>, StorageError>;
}

pub(super) fn check_ttl(ttl: u64) -> Result<(), StorageError> {
    if ttl == 0 {
        return Err(StorageError::InvalidInput(
            "TTL must be greater than zero".to_string(),
        ));
    }
    Ok(())
}
