//! oauth2_session - GitHub OAuth2 login and server-side sessions
//!
//! This crate issues and redeems the OAuth2 `state` token, provisions local
//! users from the provider profile, and maps opaque session tokens to user
//! emails in a shared key-value store. It is framework agnostic; see
//! `oauth2_session_axum` for the HTTP wiring.

mod config;
mod coordination;
mod identity;
mod oauth2;
mod session;
mod storage;
mod userdb;
mod utils;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::{AUTH_ROUTE_PREFIX, AuthConfig, ConfigError};

pub use coordination::{AuthCoordinator, CoordinationError};

pub use identity::IdentityResolver;

pub use oauth2::{
    AuthResponse, GitHubProvider, IdentityProvider, OAuth2Error, ProviderProfile, ProviderToken,
};

pub use session::{
    OAUTH2_STATE_MAX_AGE, SESSION_COOKIE_MAX_AGE, SESSION_COOKIE_NAME, SessionError,
    SessionManager, SessionToken, StateManager, StateToken, expired_session_cookie,
    get_session_token_from_headers, session_cookie,
};

pub use storage::{
    CachePrefix, CacheStore, DataStore, InMemoryCacheStore, RedisCacheStore, StorageError,
    connect_cache_store, connect_data_store,
};

pub use userdb::{InMemoryUserStore, NewUser, SqlUserStore, User, UserError, UserStore};

pub use utils::{UtilError, gen_random_string};
