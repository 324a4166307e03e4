mod config;
mod errors;
mod main;
mod types;

pub use config::{OAUTH2_STATE_MAX_AGE, SESSION_COOKIE_MAX_AGE, SESSION_COOKIE_NAME};
pub use errors::SessionError;
pub use main::{
    SessionManager, StateManager, expired_session_cookie, get_session_token_from_headers,
    session_cookie,
};
pub use types::{SessionToken, StateToken};
