mod cache_store;
mod data_store;
mod errors;
mod types;

pub use cache_store::{CacheStore, InMemoryCacheStore, RedisCacheStore, connect_cache_store};
pub use data_store::{DB_TABLE_USERS, DataStore, connect_data_store};
pub use errors::StorageError;
pub use types::CachePrefix;
