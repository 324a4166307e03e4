//! Combined router for all authentication endpoints

use axum::Router;
use tower_http::LatencyUnit;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use oauth2_session::AuthCoordinator;

/// Create a router for the authentication endpoints
///
/// Mount it under [`AUTH_ROUTE_PREFIX`](oauth2_session::AUTH_ROUTE_PREFIX). The endpoints are:
/// - `GET {prefix}` login page
/// - `GET {prefix}/github` redirect to GitHub
/// - `GET {prefix}/github/callback` OAuth2 callback
/// - `GET {prefix}/logout` end the session
pub fn auth_router<S>(auth: AuthCoordinator) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    auth_router_no_trace(auth).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(
                DefaultOnResponse::new()
                    .level(Level::INFO)
                    .latency_unit(LatencyUnit::Millis),
            ),
    )
}

/// Same as [`auth_router`] without the HTTP tracing middleware.
pub fn auth_router_no_trace<S>(auth: AuthCoordinator) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .merge(super::pages::router())
        .merge(super::oauth2::router())
        .with_state(auth)
}
