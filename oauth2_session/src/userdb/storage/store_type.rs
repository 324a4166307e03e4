use async_trait::async_trait;
use std::sync::Arc;

use crate::storage::DataStore;
use crate::userdb::{
    errors::UserError,
    types::{NewUser, User},
};

use super::postgres::*;
use super::sqlite::*;

/// Persistence for local user accounts.
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    /// Create the backing table if it does not exist yet.
    async fn init(&self) -> Result<(), UserError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError>;

    /// Insert a new user.
    ///
    /// Fails with [`UserError::ConstraintViolation`] when the email is already taken.
    async fn insert(&self, user: NewUser) -> Result<User, UserError>;
}

/// [`UserStore`] over a SQLite or PostgreSQL pool.
pub struct SqlUserStore {
    store: Arc<dyn DataStore>,
}

impl SqlUserStore {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl UserStore for SqlUserStore {
    async fn init(&self) -> Result<(), UserError> {
        match (self.store.as_sqlite(), self.store.as_postgres()) {
            (Some(pool), _) => create_tables_sqlite(pool).await,
            (_, Some(pool)) => create_tables_postgres(pool).await,
            _ => Err(UserError::Storage("Unsupported database type".to_string())),
        }
    }

    #[tracing::instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        let result = if let Some(pool) = self.store.as_sqlite() {
            find_user_by_email_sqlite(pool, email).await
        } else if let Some(pool) = self.store.as_postgres() {
            find_user_by_email_postgres(pool, email).await
        } else {
            Err(UserError::Storage("Unsupported database type".to_string()))
        };

        match &result {
            Ok(Some(_)) => tracing::info!(found = true, "User lookup completed"),
            Ok(None) => tracing::info!(found = false, "User lookup completed - not found"),
            Err(e) => tracing::error!(error = %e, "User lookup failed"),
        }

        result
    }

    #[tracing::instrument(skip(self, user), fields(email = %user.email))]
    async fn insert(&self, user: NewUser) -> Result<User, UserError> {
        let result = if let Some(pool) = self.store.as_sqlite() {
            insert_user_sqlite(pool, user).await
        } else if let Some(pool) = self.store.as_postgres() {
            insert_user_postgres(pool, user).await
        } else {
            Err(UserError::Storage("Unsupported database type".to_string()))
        };

        match &result {
            Ok(user) => tracing::info!(user_id = user.id, "User created"),
            Err(UserError::ConstraintViolation(_)) => {
                tracing::info!("User insert hit the unique email constraint")
            }
            Err(e) => tracing::error!(error = %e, "User insert failed"),
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::connect_data_store;

    async fn sqlite_store() -> SqlUserStore {
        let data_store = connect_data_store("sqlite", "sqlite::memory:")
            .await
            .unwrap();
        let store = SqlUserStore::new(data_store);
        store.init().await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_init_is_idempotent() {
        let store = sqlite_store().await;
        assert!(store.init().await.is_ok());
    }

    #[tokio::test]
    async fn test_insert_then_find() {
        // Given an empty users table
        let store = sqlite_store().await;

        // When a user is inserted
        let created = store
            .insert(NewUser::new("Ada Lovelace", "ada@example.com"))
            .await
            .unwrap();

        // Then it can be found by email with the same fields
        let found = store.find_by_email("ada@example.com").await.unwrap();
        assert_eq!(found.as_ref(), Some(&created));
        assert_eq!(created.full_name, "Ada Lovelace");
        assert_eq!(created.created_at, created.updated_at);
    }

    #[tokio::test]
    async fn test_find_missing_email() {
        let store = sqlite_store().await;
        assert!(
            store
                .find_by_email("nobody@example.com")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_duplicate_email_is_constraint_violation() {
        let store = sqlite_store().await;
        store
            .insert(NewUser::new("Ada", "ada@example.com"))
            .await
            .unwrap();

        let result = store
            .insert(NewUser::new("Someone Else", "ada@example.com"))
            .await;

        assert!(matches!(result, Err(UserError::ConstraintViolation(_))));
    }

    #[tokio::test]
    async fn test_ids_are_distinct() {
        let store = sqlite_store().await;
        let a = store.insert(NewUser::new("A", "a@example.com")).await.unwrap();
        let b = store.insert(NewUser::new("B", "b@example.com")).await.unwrap();
        assert_ne!(a.id, b.id);
    }
}
