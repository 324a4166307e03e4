//! Database connection and table configuration

use std::{env, str::FromStr, sync::Arc, sync::LazyLock};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use crate::storage::errors::StorageError;

use super::types::{DataStore, PostgresDataStore, SqliteDataStore};

/// Table prefix from environment variable
static DB_TABLE_PREFIX: LazyLock<String> =
    LazyLock::new(|| env::var("DB_TABLE_PREFIX").unwrap_or_default());

/// Users table name, `DB_TABLE_USERS` or `{DB_TABLE_PREFIX}users`
pub static DB_TABLE_USERS: LazyLock<String> = LazyLock::new(|| {
    env::var("DB_TABLE_USERS").unwrap_or_else(|_| format!("{}users", *DB_TABLE_PREFIX))
});

/// Open a connection pool for `store_type` (`sqlite` or `postgres`).
///
/// Pools connect lazily; the first query (table creation at startup) surfaces
/// connectivity problems.
pub async fn connect_data_store(
    store_type: &str,
    store_url: &str,
) -> Result<Arc<dyn DataStore>, StorageError> {
    tracing::info!("Initializing data store with type: {}", store_type);

    let store: Arc<dyn DataStore> = match store_type {
        "sqlite" => {
            let opts = SqliteConnectOptions::from_str(store_url)?.create_if_missing(true);
            let pool_options = if store_url.contains(":memory:") {
                // An in-memory database lives and dies with its one connection
                SqlitePoolOptions::new()
                    .max_connections(1)
                    .idle_timeout(None)
                    .max_lifetime(None)
            } else {
                SqlitePoolOptions::new()
            };
            Arc::new(SqliteDataStore {
                pool: pool_options.connect_lazy_with(opts),
            })
        }
        "postgres" => Arc::new(PostgresDataStore {
            pool: sqlx::PgPool::connect_lazy(store_url)?,
        }),
        t => {
            return Err(StorageError::Unsupported(format!(
                "Unsupported store type: {t}. Supported types are 'sqlite' and 'postgres'"
            )));
        }
    };

    Ok(store)
}
