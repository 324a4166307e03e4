use std::sync::Arc;

use crate::session::config::OAUTH2_STATE_MAX_AGE;
use crate::session::errors::SessionError;
use crate::session::types::StateToken;
use crate::storage::{CachePrefix, CacheStore};
use crate::utils::{TOKEN_BYTES, gen_random_string};

// Stored value carries no meaning; presence of the key is the proof
const STATE_MARKER: &str = "0";

/// Issues and redeems OAuth2 `state` tokens.
#[derive(Clone)]
pub struct StateManager {
    store: Arc<dyn CacheStore>,
    ttl: u64,
}

impl StateManager {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self {
            store,
            ttl: *OAUTH2_STATE_MAX_AGE,
        }
    }

    pub fn with_ttl(mut self, ttl: u64) -> Self {
        self.ttl = ttl;
        self
    }

    #[tracing::instrument(skip(self))]
    pub async fn issue(&self) -> Result<StateToken, SessionError> {
        let token = gen_random_string(TOKEN_BYTES)?;
        self.store
            .put_with_ttl(CachePrefix::AuthToken, &token, STATE_MARKER, self.ttl)
            .await?;
        tracing::debug!(ttl = self.ttl, "Issued state token");
        Ok(StateToken::new(token))
    }

    /// Succeeds at most once per issued token.
    ///
    /// Never-issued, already-consumed, and expired tokens all fail with
    /// [`SessionError::NotFoundOrExpired`].
    #[tracing::instrument(skip_all)]
    pub async fn verify_and_consume(&self, token: &str) -> Result<(), SessionError> {
        if token.is_empty() {
            tracing::debug!("Empty state parameter");
            return Err(SessionError::NotFoundOrExpired);
        }

        match self.store.take(CachePrefix::AuthToken, token).await? {
            Some(_) => {
                tracing::debug!("State token verified and consumed");
                Ok(())
            }
            None => {
                tracing::debug!("State token not found or expired");
                Err(SessionError::NotFoundOrExpired)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{InMemoryCacheStore, StorageError};
    use async_trait::async_trait;
    use std::time::Duration;

    fn manager() -> (Arc<InMemoryCacheStore>, StateManager) {
        let store = Arc::new(InMemoryCacheStore::new());
        (store.clone(), StateManager::new(store).with_ttl(3600))
    }

    #[tokio::test]
    async fn test_issue_stores_under_auth_token_namespace() {
        let (store, states) = manager();

        let token = states.issue().await.unwrap();

        let stored = store
            .get(CachePrefix::AuthToken, token.as_str())
            .await
            .unwrap();
        assert_eq!(stored.as_deref(), Some("0"));
        assert!(
            store
                .get(CachePrefix::Session, token.as_str())
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_verify_succeeds_exactly_once() {
        // Given an issued state token
        let (_, states) = manager();
        let token = states.issue().await.unwrap();

        // When it is verified twice
        let first = states.verify_and_consume(token.as_str()).await;
        let second = states.verify_and_consume(token.as_str()).await;

        // Then only the first verification succeeds
        assert!(first.is_ok());
        assert!(matches!(second, Err(SessionError::NotFoundOrExpired)));
    }

    #[tokio::test]
    async fn test_verify_unknown_token() {
        let (_, states) = manager();
        let result = states.verify_and_consume("never-issued").await;
        assert!(matches!(result, Err(SessionError::NotFoundOrExpired)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_verify_after_ttl_fails() {
        let (_, states) = manager();
        let token = states.issue().await.unwrap();

        tokio::time::advance(Duration::from_secs(3600)).await;

        let result = states.verify_and_consume(token.as_str()).await;
        assert!(matches!(result, Err(SessionError::NotFoundOrExpired)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_verify_just_before_ttl_succeeds() {
        let (_, states) = manager();
        let token = states.issue().await.unwrap();

        tokio::time::advance(Duration::from_secs(3599)).await;

        assert!(states.verify_and_consume(token.as_str()).await.is_ok());
    }

    struct UnreachableStore;

    #[async_trait]
    impl CacheStore for UnreachableStore {
        async fn init(&self) -> Result<(), StorageError> {
            unreachable!()
        }
        async fn put_with_ttl(
            &self,
            _: CachePrefix,
            _: &str,
            _: &str,
            _: u64,
        ) -> Result<(), StorageError> {
            unreachable!()
        }
        async fn get(&self, _: CachePrefix, _: &str) -> Result<Option<String>, StorageError> {
            unreachable!()
        }
        async fn remove(&self, _: CachePrefix, _: &str) -> Result<(), StorageError> {
            unreachable!()
        }
        async fn take(&self, _: CachePrefix, _: &str) -> Result<Option<String>, StorageError> {
            unreachable!()
        }
    }

    #[tokio::test]
    async fn test_empty_token_short_circuits() {
        // An empty state never reaches the store
        let states = StateManager::new(Arc::new(UnreachableStore));
        let result = states.verify_and_consume("").await;
        assert!(matches!(result, Err(SessionError::NotFoundOrExpired)));
    }
}
