use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::userdb::{
    errors::UserError,
    types::{NewUser, User},
};

use super::store_type::UserStore;

/// Process-local [`UserStore`] with the same unique-email rule as the SQL tables.
#[derive(Default)]
pub struct InMemoryUserStore {
    users: Mutex<Vec<User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn init(&self) -> Result<(), UserError> {
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        let users = self.users.lock().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn insert(&self, user: NewUser) -> Result<User, UserError> {
        let mut users = self.users.lock().await;
        if users.iter().any(|u| u.email == user.email) {
            return Err(UserError::ConstraintViolation(format!(
                "email {} already exists",
                user.email
            )));
        }

        let now = Utc::now();
        let created = User {
            id: users.len() as i64 + 1,
            full_name: user.full_name,
            email: user.email,
            created_at: now,
            updated_at: now,
        };
        users.push(created.clone());
        Ok(created)
    }
}
