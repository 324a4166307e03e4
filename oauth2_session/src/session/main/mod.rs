mod cookie;
mod session;
mod state;

pub use cookie::{expired_session_cookie, get_session_token_from_headers, session_cookie};
pub use session::SessionManager;
pub use state::StateManager;
