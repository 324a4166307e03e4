use axum::{
    extract::{FromRef, FromRequestParts},
    response::{IntoResponse, Redirect, Response},
};
use http::request::Parts;

use oauth2_session::AuthCoordinator;

use super::config::AUTH_LOGIN_URL;

/// Rejection that sends the browser to the login page.
#[derive(Debug)]
pub struct AuthRedirect;

impl IntoResponse for AuthRedirect {
    fn into_response(self) -> Response {
        tracing::debug!("Redirecting to {}", AUTH_LOGIN_URL.as_str());
        Redirect::to(AUTH_LOGIN_URL.as_str()).into_response()
    }
}

/// Authenticated user, available as an Axum extractor
///
/// Behind [`require_auth`](crate::require_auth) the value attached by the
/// middleware is reused. On other routes the session cookie is resolved
/// directly. Either way a missing, unknown, or expired session rejects with
/// [`AuthRedirect`].
///
/// # Example
///
/// ```no_run
/// use axum::{routing::get, Router};
/// use oauth2_session_axum::{AuthCoordinator, AuthUser};
///
/// async fn protected_handler(user: AuthUser) -> String {
///     format!("Hello, {}!", user.email)
/// }
///
/// fn app(auth: AuthCoordinator) -> Router {
///     Router::new()
///         .route("/protected", get(protected_handler))
///         .with_state(auth)
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser {
    /// Email the session was issued for
    pub email: String,
}

impl<S> FromRequestParts<S> for AuthUser
where
    AuthCoordinator: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRedirect;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }

        let auth = AuthCoordinator::from_ref(state);
        match auth.authenticate(&parts.headers).await {
            Ok(email) => Ok(AuthUser { email }),
            Err(e) => {
                tracing::debug!("No valid session: {}", e);
                Err(AuthRedirect)
            }
        }
    }
}
