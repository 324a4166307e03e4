mod errors;
mod storage;
mod types;

pub use errors::UserError;
pub use storage::{InMemoryUserStore, SqlUserStore, UserStore};
pub use types::{NewUser, User};
