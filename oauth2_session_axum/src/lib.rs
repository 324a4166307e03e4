mod config;
mod error;
mod middleware;
mod oauth2;
mod pages;
mod router;
mod session;

pub use config::{AUTH_LOGIN_URL, AUTH_REDIRECT_USER};
pub use error::IntoResponseError;
pub use middleware::require_auth;
pub use router::{auth_router, auth_router_no_trace};
pub use session::{AuthRedirect, AuthUser};

// Re-export the core types an application needs to wire the router
pub use oauth2_session::{AUTH_ROUTE_PREFIX, AuthConfig, AuthCoordinator};
