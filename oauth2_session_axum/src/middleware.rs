use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use oauth2_session::AuthCoordinator;

use super::session::{AuthRedirect, AuthUser};

/// Gate for protected routes.
///
/// Resolves the session cookie on every request. With a live session the
/// [`AuthUser`] is attached to the request extensions and the inner handler
/// runs; otherwise the browser is redirected to the login page and the
/// handler is never reached.
///
/// ```no_run
/// use axum::{middleware, routing::get, Router};
/// use oauth2_session_axum::{AuthCoordinator, require_auth};
///
/// fn protected(auth: AuthCoordinator) -> Router {
///     Router::new()
///         .route("/", get(|| async { "secret" }))
///         .route_layer(middleware::from_fn_with_state(auth.clone(), require_auth))
///         .with_state(auth)
/// }
/// ```
#[tracing::instrument(
    name = "require_auth",
    skip_all,
    fields(otel.kind = "server", otel.status_code = tracing::field::Empty)
)]
pub async fn require_auth(
    State(auth): State<AuthCoordinator>,
    mut req: Request,
    next: Next,
) -> Response {
    match auth.authenticate(req.headers()).await {
        Ok(email) => {
            tracing::Span::current().record("otel.status_code", "OK");
            tracing::debug!(email = %email, "Authenticated request");
            req.extensions_mut().insert(AuthUser { email });
            next.run(req).await
        }
        Err(e) => {
            tracing::info!(reason = %e, "Redirecting to login");
            AuthRedirect.into_response()
        }
    }
}
