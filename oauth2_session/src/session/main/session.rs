use std::sync::Arc;

use crate::session::config::SESSION_COOKIE_MAX_AGE;
use crate::session::errors::SessionError;
use crate::session::types::SessionToken;
use crate::storage::{CachePrefix, CacheStore};
use crate::utils::{TOKEN_BYTES, gen_random_string};

/// Maps session tokens to user emails with a fixed absolute lifetime.
///
/// Resolving a session never extends it; a user may hold any number of
/// sessions at once and each is revoked independently.
#[derive(Clone)]
pub struct SessionManager {
    store: Arc<dyn CacheStore>,
    ttl: u64,
}

impl SessionManager {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self {
            store,
            ttl: *SESSION_COOKIE_MAX_AGE,
        }
    }

    pub fn with_ttl(mut self, ttl: u64) -> Self {
        self.ttl = ttl;
        self
    }

    /// Session lifetime in seconds
    pub fn ttl(&self) -> u64 {
        self.ttl
    }

    #[tracing::instrument(skip(self), fields(email = %email))]
    pub async fn issue(&self, email: &str) -> Result<SessionToken, SessionError> {
        if email.is_empty() {
            return Err(SessionError::InvalidInput(
                "Cannot create a session without an email".to_string(),
            ));
        }

        let token = gen_random_string(TOKEN_BYTES)?;
        self.store
            .put_with_ttl(CachePrefix::Session, &token, email, self.ttl)
            .await?;
        tracing::info!(ttl = self.ttl, "Created new session");
        Ok(SessionToken::new(token))
    }

    /// Email bound to `token`, or [`SessionError::NotFoundOrExpired`].
    #[tracing::instrument(skip_all)]
    pub async fn resolve(&self, token: &str) -> Result<String, SessionError> {
        if token.is_empty() {
            return Err(SessionError::NotFoundOrExpired);
        }

        self.store
            .get(CachePrefix::Session, token)
            .await?
            .ok_or(SessionError::NotFoundOrExpired)
    }

    /// Delete the session. Revoking an unknown or already revoked token succeeds.
    #[tracing::instrument(skip_all)]
    pub async fn revoke(&self, token: &str) -> Result<(), SessionError> {
        if token.is_empty() {
            return Ok(());
        }

        self.store.remove(CachePrefix::Session, token).await?;
        tracing::debug!("Session revoked");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryCacheStore;
    use proptest::prelude::*;
    use std::time::Duration;

    fn manager() -> SessionManager {
        SessionManager::new(Arc::new(InMemoryCacheStore::new())).with_ttl(86400)
    }

    #[tokio::test]
    async fn test_issue_then_resolve() {
        let sessions = manager();

        let token = sessions.issue("ada@example.com").await.unwrap();

        assert_eq!(
            sessions.resolve(token.as_str()).await.unwrap(),
            "ada@example.com"
        );
    }

    #[tokio::test]
    async fn test_issue_rejects_empty_email() {
        let result = manager().issue("").await;
        assert!(matches!(result, Err(SessionError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_resolve_unknown_token() {
        let result = manager().resolve("garbage").await;
        assert!(matches!(result, Err(SessionError::NotFoundOrExpired)));
    }

    #[tokio::test]
    async fn test_resolve_after_revoke() {
        let sessions = manager();
        let token = sessions.issue("ada@example.com").await.unwrap();

        sessions.revoke(token.as_str()).await.unwrap();

        let result = sessions.resolve(token.as_str()).await;
        assert!(matches!(result, Err(SessionError::NotFoundOrExpired)));
    }

    #[tokio::test]
    async fn test_revoke_is_idempotent() {
        let sessions = manager();
        let token = sessions.issue("ada@example.com").await.unwrap();

        assert!(sessions.revoke(token.as_str()).await.is_ok());
        assert!(sessions.revoke(token.as_str()).await.is_ok());
        assert!(sessions.revoke("never-issued").await.is_ok());
    }

    #[tokio::test]
    async fn test_revoke_leaves_other_sessions_alone() {
        // Given two sessions for the same user
        let sessions = manager();
        let laptop = sessions.issue("ada@example.com").await.unwrap();
        let phone = sessions.issue("ada@example.com").await.unwrap();
        assert_ne!(laptop, phone);

        // When one is revoked
        sessions.revoke(laptop.as_str()).await.unwrap();

        // Then the other still resolves
        assert_eq!(
            sessions.resolve(phone.as_str()).await.unwrap(),
            "ada@example.com"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_resolve_does_not_extend_lifetime() {
        // Given a session resolved repeatedly during its lifetime
        let sessions = manager();
        let token = sessions.issue("ada@example.com").await.unwrap();

        for _ in 0..23 {
            tokio::time::advance(Duration::from_secs(3600)).await;
            assert!(sessions.resolve(token.as_str()).await.is_ok());
        }

        // Then it still expires 24 hours after issuance
        tokio::time::advance(Duration::from_secs(3600)).await;
        let result = sessions.resolve(token.as_str()).await;
        assert!(matches!(result, Err(SessionError::NotFoundOrExpired)));
    }

    proptest! {
        #[test]
        fn prop_issue_resolve_round_trip(email in "\\PC{1,64}") {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()
                .unwrap();
            let resolved = rt.block_on(async {
                let sessions = manager();
                let token = sessions.issue(&email).await.unwrap();
                sessions.resolve(token.as_str()).await.unwrap()
            });
            prop_assert_eq!(resolved, email);
        }
    }
}
