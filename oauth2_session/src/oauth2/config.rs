use std::{env, sync::LazyLock, time::Duration};

pub(super) static OAUTH2_AUTH_URL: LazyLock<String> = LazyLock::new(|| {
    env::var("OAUTH2_AUTH_URL")
        .unwrap_or_else(|_| "https://github.com/login/oauth/authorize".to_string())
});

pub(super) static OAUTH2_TOKEN_URL: LazyLock<String> = LazyLock::new(|| {
    env::var("OAUTH2_TOKEN_URL")
        .unwrap_or_else(|_| "https://github.com/login/oauth/access_token".to_string())
});

pub(super) static OAUTH2_USERINFO_URL: LazyLock<String> = LazyLock::new(|| {
    env::var("OAUTH2_USERINFO_URL").unwrap_or_else(|_| "https://api.github.com/user".to_string())
});

pub(super) const OAUTH2_SCOPE: &str = "user";

pub(super) const HTTP_TIMEOUT: Duration = Duration::from_secs(120);

// GitHub rejects API requests without a User-Agent
pub(super) const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
