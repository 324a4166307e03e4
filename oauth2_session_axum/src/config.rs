//! Redirect targets for the axum integration

use std::sync::LazyLock;

use oauth2_session::AUTH_ROUTE_PREFIX;

/// Where unauthenticated browsers are sent
/// Default: the auth route prefix, "/auth"
pub static AUTH_LOGIN_URL: LazyLock<String> = LazyLock::new(|| {
    std::env::var("AUTH_LOGIN_URL").unwrap_or_else(|_| AUTH_ROUTE_PREFIX.to_string())
});

/// Where browsers land after a successful login
/// Default: "/"
pub static AUTH_REDIRECT_USER: LazyLock<String> =
    LazyLock::new(|| std::env::var("AUTH_REDIRECT_USER").unwrap_or_else(|_| "/".to_string()));

