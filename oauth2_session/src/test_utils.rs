//! Scripted collaborators for exercising the login flow without a network or database
//!
//! Compiled for this crate's own tests and, with the `test-utils` feature, for
//! downstream crates' tests.

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::coordination::AuthCoordinator;
use crate::oauth2::{IdentityProvider, OAuth2Error, ProviderProfile, ProviderToken};
use crate::session::{SessionManager, StateManager, StateToken};
use crate::storage::{CacheStore, InMemoryCacheStore};
use crate::userdb::{InMemoryUserStore, NewUser, User, UserError, UserStore};

/// Identity provider that accepts one code and returns one profile.
pub struct MockProvider {
    pub expected_code: String,
    pub access_token: String,
    pub profile: ProviderProfile,
    pub exchange_calls: AtomicUsize,
    pub profile_calls: AtomicUsize,
}

impl MockProvider {
    pub fn new(code: &str, access_token: &str, name: &str, email: &str) -> Self {
        Self {
            expected_code: code.to_string(),
            access_token: access_token.to_string(),
            profile: ProviderProfile {
                name: name.to_string(),
                email: email.to_string(),
            },
            exchange_calls: AtomicUsize::new(0),
            profile_calls: AtomicUsize::new(0),
        }
    }

    pub fn exchange_calls(&self) -> usize {
        self.exchange_calls.load(Ordering::SeqCst)
    }

    pub fn profile_calls(&self) -> usize {
        self.profile_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityProvider for MockProvider {
    fn authorize_url(&self, state: &StateToken) -> Result<String, OAuth2Error> {
        Ok(format!(
            "https://provider.test/authorize?state={}",
            state.as_str()
        ))
    }

    async fn exchange_code(&self, code: &str) -> Result<ProviderToken, OAuth2Error> {
        self.exchange_calls.fetch_add(1, Ordering::SeqCst);
        if code != self.expected_code {
            return Err(OAuth2Error::TokenExchange("bad_verification_code".to_string()));
        }
        Ok(ProviderToken {
            access_token: self.access_token.clone(),
        })
    }

    async fn fetch_profile(&self, access_token: &str) -> Result<ProviderProfile, OAuth2Error> {
        self.profile_calls.fetch_add(1, Ordering::SeqCst);
        if access_token != self.access_token {
            return Err(OAuth2Error::FetchUserInfo("401 Unauthorized".to_string()));
        }
        Ok(self.profile.clone())
    }
}

/// In-memory user store that counts inserts.
#[derive(Default)]
pub struct CountingUserStore {
    inner: InMemoryUserStore,
    inserts: AtomicUsize,
    inserted_emails: tokio::sync::Mutex<Vec<String>>,
}

impl CountingUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_calls(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }

    pub async fn inserted_emails(&self) -> Vec<String> {
        self.inserted_emails.lock().await.clone()
    }
}

#[async_trait]
impl UserStore for CountingUserStore {
    async fn init(&self) -> Result<(), UserError> {
        self.inner.init().await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        self.inner.find_by_email(email).await
    }

    async fn insert(&self, user: NewUser) -> Result<User, UserError> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        self.inserted_emails.lock().await.push(user.email.clone());
        self.inner.insert(user).await
    }
}

/// Collaborators wired into a coordinator, kept for assertions.
pub struct TestHarness {
    pub cache: Arc<InMemoryCacheStore>,
    pub users: Arc<CountingUserStore>,
    pub provider: Arc<MockProvider>,
    pub coordinator: AuthCoordinator,
}

/// Coordinator over in-memory stores and a provider scripted for
/// `code=ABC` → `T1` → `{Ada, ada@example.com}`.
pub fn test_harness() -> TestHarness {
    let cache = Arc::new(InMemoryCacheStore::new());
    let users = Arc::new(CountingUserStore::new());
    let provider = Arc::new(MockProvider::new("ABC", "T1", "Ada", "ada@example.com"));

    let cache_store: Arc<dyn CacheStore> = cache.clone();
    let coordinator = AuthCoordinator::with_managers(
        StateManager::new(cache_store.clone()).with_ttl(3600),
        SessionManager::new(cache_store).with_ttl(86400),
        users.clone(),
        provider.clone(),
    );

    TestHarness {
        cache,
        users,
        provider,
        coordinator,
    }
}
