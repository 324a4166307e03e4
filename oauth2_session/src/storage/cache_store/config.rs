use std::sync::Arc;

use crate::storage::errors::StorageError;

use super::types::{CacheStore, InMemoryCacheStore, RedisCacheStore};

fn normalize_redis_url(url: &str) -> Result<String, StorageError> {
    if url.starts_with("redis://") || url.starts_with("rediss://") {
        return Ok(url.to_string());
    }
    if url.contains("://") {
        return Err(StorageError::Unsupported(format!(
            "Unsupported cache store URL: {url}. Supported values are 'memory', redis:// URLs, and host:port"
        )));
    }
    Ok(format!("redis://{url}"))
}

/// Open the token store named by `url` and verify it answers.
///
/// Accepts `memory`, `redis://…`/`rediss://…`, or a bare `host:port`. Any
/// failure here is meant to stop the process before it serves traffic.
pub async fn connect_cache_store(url: &str) -> Result<Arc<dyn CacheStore>, StorageError> {
    let store: Arc<dyn CacheStore> = if url == "memory" {
        Arc::new(InMemoryCacheStore::new())
    } else {
        let redis_url = normalize_redis_url(url)?;
        let store = RedisCacheStore::connect(&redis_url).await.map_err(|e| {
            tracing::error!("Failed to connect to Redis: {}", e);
            e
        })?;
        Arc::new(store)
    };

    store.init().await.map_err(|e| {
        tracing::error!("Cache store did not respond: {}", e);
        e
    })?;

    tracing::info!(
        store_type = if url == "memory" { "memory" } else { "redis" },
        "Connected to cache store"
    );
    Ok(store)
}
