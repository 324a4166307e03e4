use http::HeaderMap;
use std::sync::Arc;

use crate::identity::IdentityResolver;
use crate::oauth2::{AuthResponse, IdentityProvider, OAuth2Error};
use crate::session::{
    SessionError, SessionManager, StateManager, expired_session_cookie,
    get_session_token_from_headers, session_cookie,
};
use crate::storage::CacheStore;
use crate::userdb::{User, UserStore};
use crate::utils::header_set_cookie;

use super::errors::CoordinationError;

/// Drives the login, callback, and logout legs of the authorization-code flow.
///
/// All collaborators are injected; the coordinator itself holds no state and
/// is cheap to clone into request handlers.
#[derive(Clone)]
pub struct AuthCoordinator {
    states: StateManager,
    sessions: SessionManager,
    identities: IdentityResolver,
    users: Arc<dyn UserStore>,
    provider: Arc<dyn IdentityProvider>,
}

impl AuthCoordinator {
    /// Coordinator with state and session lifetimes taken from the environment.
    pub fn new(
        cache: Arc<dyn CacheStore>,
        users: Arc<dyn UserStore>,
        provider: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self::with_managers(
            StateManager::new(cache.clone()),
            SessionManager::new(cache),
            users,
            provider,
        )
    }

    pub fn with_managers(
        states: StateManager,
        sessions: SessionManager,
        users: Arc<dyn UserStore>,
        provider: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            states,
            sessions,
            identities: IdentityResolver::new(users.clone()),
            users,
            provider,
        }
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    /// Issue a state token and return the provider URL to redirect the browser to.
    #[tracing::instrument(skip(self))]
    pub async fn start_login(&self) -> Result<String, CoordinationError> {
        let state = self.states.issue().await?;
        let auth_url = self.provider.authorize_url(&state)?;
        tracing::debug!("Redirecting to identity provider");
        Ok(auth_url)
    }

    /// Handle the provider callback.
    ///
    /// Returns headers carrying the new session cookie together with the
    /// signed-in user. Any failure aborts before a cookie is produced, and a
    /// bad `state` aborts before the provider is contacted.
    #[tracing::instrument(skip_all)]
    pub async fn complete_login(
        &self,
        auth_response: &AuthResponse,
    ) -> Result<(HeaderMap, User), CoordinationError> {
        self.states
            .verify_and_consume(&auth_response.state)
            .await
            .map_err(|e| match e {
                SessionError::NotFoundOrExpired => {
                    CoordinationError::InvalidState("State token not found or expired".to_string())
                        .log()
                }
                other => CoordinationError::from(other),
            })?;

        // Provider-side denial comes back with a state but no code
        if auth_response.code.is_empty() {
            return Err(
                OAuth2Error::TokenExchange("Missing authorization code".to_string()).into(),
            );
        }

        let token = self.provider.exchange_code(&auth_response.code).await?;
        let profile = self.provider.fetch_profile(&token.access_token).await?;
        let user = self.identities.find_or_create(&profile).await?;

        let session = self.sessions.issue(&user.email).await?;

        let mut headers = HeaderMap::new();
        header_set_cookie(
            &mut headers,
            session_cookie(&session, self.sessions.ttl()),
        )?;

        tracing::info!(user_id = user.id, "User signed in");
        Ok((headers, user))
    }

    /// Revoke the request's session, if any, and return headers that clear the cookie.
    ///
    /// Store failures during revocation are logged and otherwise ignored; the
    /// browser side is always cleared.
    #[tracing::instrument(skip_all)]
    pub async fn logout(&self, headers: &HeaderMap) -> Result<HeaderMap, CoordinationError> {
        match get_session_token_from_headers(headers) {
            Ok(Some(token)) => {
                if let Err(e) = self.sessions.revoke(token).await {
                    tracing::warn!("Failed to revoke session: {}", e);
                }
            }
            Ok(None) => tracing::debug!("Logout without a session cookie"),
            Err(e) => tracing::debug!("Ignoring unreadable cookie header on logout: {}", e),
        }

        let mut response_headers = HeaderMap::new();
        header_set_cookie(&mut response_headers, expired_session_cookie())?;
        Ok(response_headers)
    }

    /// Email of the session presented in `headers`.
    ///
    /// No cookie, an unknown token, and an expired token are all
    /// [`SessionError::NotFoundOrExpired`].
    pub async fn authenticate(&self, headers: &HeaderMap) -> Result<String, SessionError> {
        let token = get_session_token_from_headers(headers)?.ok_or_else(|| {
            tracing::debug!("No session cookie");
            SessionError::NotFoundOrExpired
        })?;
        self.sessions.resolve(token).await
    }

    pub async fn find_user(&self, email: &str) -> Result<Option<User>, CoordinationError> {
        Ok(self.users.find_by_email(email).await?)
    }
}
