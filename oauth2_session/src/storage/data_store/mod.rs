mod config;
mod types;

pub use config::{DB_TABLE_USERS, connect_data_store};
pub use types::DataStore;
