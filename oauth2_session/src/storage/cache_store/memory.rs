use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::storage::errors::StorageError;
use crate::storage::types::CachePrefix;

use super::types::{CacheStore, InMemoryCacheStore, check_ttl};

impl InMemoryCacheStore {
    pub fn new() -> Self {
        tracing::info!("Creating new in-memory cache store");
        Self {
            entry: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryCacheStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheStore for InMemoryCacheStore {
    async fn init(&self) -> Result<(), StorageError> {
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
        let now = Instant::now();
        let mut entries = self.entry.lock().await;
        // Keys that are never read again would otherwise stay forever
        entries.retain(|_, (_, deadline)| now < *deadline);
        entries.insert(
            prefix.key(key),
            (value.to_string(), now + Duration::from_secs(ttl)),
        );
        Ok(())
    }

    async fn get(&self, prefix: CachePrefix, key: &str) -> Result<Option<String>, StorageError> {
        let key = prefix.key(key);
        let mut entries = self.entry.lock().await;
        match entries.get(&key) {
            Some((value, deadline)) if Instant::now() < *deadline => Ok(Some(value.clone())),
            Some(_) => {
                // Expired entries are purged on read
                entries.remove(&key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn remove(&self, prefix: CachePrefix, key: &str) -> Result<(), StorageError> {
        self.entry.lock().await.remove(&prefix.key(key));
        Ok(())
    }

    async fn take(&self, prefix: CachePrefix, key: &str) -> Result<Option<String>, StorageError> {
        let removed = self.entry.lock().await.remove(&prefix.key(key));
        Ok(removed
            .filter(|(_, deadline)| Instant::now() < *deadline)
            .map(|(value, _)| value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_put_and_get() {
        // Given an in-memory cache store
        let store = InMemoryCacheStore::new();

        // When putting a value
        store
            .put_with_ttl(CachePrefix::Session, "key1", "test value", 60)
            .await
            .unwrap();

        // Then it can be read back
        let value = store.get(CachePrefix::Session, "key1").await.unwrap();
        assert_eq!(value.as_deref(), Some("test value"));
    }

    #[tokio::test]
    async fn test_prefixes_are_isolated() {
        let store = InMemoryCacheStore::new();
        store
            .put_with_ttl(CachePrefix::AuthToken, "tok", "0", 60)
            .await
            .unwrap();

        let value = store.get(CachePrefix::Session, "tok").await.unwrap();
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn test_zero_ttl_rejected() {
        let store = InMemoryCacheStore::new();
        let result = store
            .put_with_ttl(CachePrefix::Session, "key", "value", 0)
            .await;
        assert!(matches!(result, Err(StorageError::InvalidInput(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_at_ttl() {
        // Given a value stored for 10 seconds
        let store = InMemoryCacheStore::new();
        store
            .put_with_ttl(CachePrefix::Session, "key", "value", 10)
            .await
            .unwrap();

        // Just before the deadline it is still there
        tokio::time::advance(Duration::from_millis(9_999)).await;
        assert!(
            store
                .get(CachePrefix::Session, "key")
                .await
                .unwrap()
                .is_some()
        );

        // At the deadline it is gone
        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(
            store
                .get(CachePrefix::Session, "key")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_remove_missing_key_is_ok() {
        let store = InMemoryCacheStore::new();
        assert!(store.remove(CachePrefix::Session, "nope").await.is_ok());
    }

    #[tokio::test]
    async fn test_take_returns_value_once() {
        let store = InMemoryCacheStore::new();
        store
            .put_with_ttl(CachePrefix::AuthToken, "state", "0", 60)
            .await
            .unwrap();

        let first = store.take(CachePrefix::AuthToken, "state").await.unwrap();
        let second = store.take(CachePrefix::AuthToken, "state").await.unwrap();

        assert_eq!(first.as_deref(), Some("0"));
        assert!(second.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_take_expired_returns_none() {
        let store = InMemoryCacheStore::new();
        store
            .put_with_ttl(CachePrefix::AuthToken, "state", "0", 5)
            .await
            .unwrap();

        tokio::time::advance(Duration::from_secs(6)).await;

        assert!(
            store
                .take(CachePrefix::AuthToken, "state")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_take_single_winner() {
        // Given one stored key and many concurrent takers
        let store = Arc::new(InMemoryCacheStore::new());
        store
            .put_with_ttl(CachePrefix::AuthToken, "race", "0", 60)
            .await
            .unwrap();

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.take(CachePrefix::AuthToken, "race").await })
            })
            .collect();

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap().unwrap().is_some() {
                winners += 1;
            }
        }

        // Then exactly one caller observed the value
        assert_eq!(winners, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_put_evicts_expired_entries() {
        // Given many short-lived entries that are never read again
        let store = InMemoryCacheStore::new();
        for i in 0..1000 {
            store
                .put_with_ttl(CachePrefix::AuthToken, &format!("abandoned-{i}"), "0", 1)
                .await
                .unwrap();
        }
        let live = "still-here";
        store
            .put_with_ttl(CachePrefix::Session, live, "ada@example.com", 7200)
            .await
            .unwrap();

        // When they have all expired and another value is stored
        tokio::time::advance(Duration::from_secs(3600)).await;
        store
            .put_with_ttl(CachePrefix::Session, "fresh", "bob@example.com", 60)
            .await
            .unwrap();

        // Then only unexpired entries remain
        assert_eq!(store.entry.lock().await.len(), 2);
        assert_eq!(
            store.get(CachePrefix::Session, live).await.unwrap().as_deref(),
            Some("ada@example.com")
        );
    }
}
