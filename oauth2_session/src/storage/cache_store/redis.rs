use async_trait::async_trait;
use redis::AsyncCommands;

use crate::storage::errors::StorageError;
use crate::storage::types::CachePrefix;

use super::types::{CacheStore, RedisCacheStore, check_ttl};

impl RedisCacheStore {
    pub async fn connect(url: &str) -> Result<Self, StorageError> {
        let client = redis::Client::open(url)?;
        let conn = client.get_multiplexed_async_connection().await?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    async fn init(&self) -> Result<(), StorageError> {
        let mut conn = self.conn.clone();
        let pong: String = redis::cmd("PING").query_async(&mut conn).await?;
        tracing::debug!(reply = %pong, "Redis responded to PING");
        Ok(())
    }

    async fn put_with_ttl(
        &self,
        prefix: CachePrefix,
        key: &str,
        value: &str,
        ttl: u64,
    ) -> Result<(), StorageError> {
        check_ttl(ttl)?;
        let mut conn = self.conn.clone();
        let _: () = conn.set_ex(prefix.key(key), value, ttl).await?;
        Ok(())
    }

    async fn get(&self, prefix: CachePrefix, key: &str) -> Result<Option<String>, StorageError> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(prefix.key(key)).await?;
        Ok(value)
    }

    async fn remove(&self, prefix: CachePrefix, key: &str) -> Result<(), StorageError> {
        let mut conn = self.conn.clone();
        let _: () = conn.del(prefix.key(key)).await?;
        Ok(())
    }

    async fn take(&self, prefix: CachePrefix, key: &str) -> Result<Option<String>, StorageError> {
        let mut conn = self.conn.clone();
        // GETDEL: read and delete in one server-side step
        let value: Option<String> = conn.get_del(prefix.key(key)).await?;
        Ok(value)
    }
}
