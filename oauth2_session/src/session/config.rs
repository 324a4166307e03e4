use std::env;
use std::sync::LazyLock;

pub static SESSION_COOKIE_NAME: LazyLock<String> = LazyLock::new(|| {
    env::var("SESSION_COOKIE_NAME")
        .ok()
        .unwrap_or("session_key".to_string())
});

/// Session lifetime in seconds; also the cookie's Max-Age
pub static SESSION_COOKIE_MAX_AGE: LazyLock<u64> = LazyLock::new(|| {
    env::var("SESSION_COOKIE_MAX_AGE")
        .ok()
        .and_then(|s| s.parse().ok())
        .filter(|ttl| *ttl > 0)
        .unwrap_or(86400) // 24 hours
});

/// Lifetime of the OAuth2 state token in seconds
pub static OAUTH2_STATE_MAX_AGE: LazyLock<u64> = LazyLock::new(|| {
    env::var("OAUTH2_STATE_MAX_AGE")
        .ok()
        .and_then(|s| s.parse().ok())
        .filter(|ttl| *ttl > 0)
        .unwrap_or(3600) // 60 minutes
});

pub(crate) static SESSION_COOKIE_SECURE: LazyLock<bool> = LazyLock::new(|| {
    env::var("SESSION_COOKIE_SECURE")
        .map(|val| val.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
});
