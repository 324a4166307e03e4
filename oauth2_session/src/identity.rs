//! Find-or-create of local users from verified provider profiles

use std::sync::Arc;

use crate::oauth2::ProviderProfile;
use crate::userdb::{NewUser, User, UserError, UserStore};

#[derive(Clone)]
pub struct IdentityResolver {
    users: Arc<dyn UserStore>,
}

impl IdentityResolver {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// Return the user owning `profile.email`, creating it on first sight.
    ///
    /// An existing record is returned as stored; the provider's current name
    /// does not overwrite it. When a concurrent login wins the insert race the
    /// winner's row is looked up once and returned.
    #[tracing::instrument(skip(self, profile), fields(email = %profile.email))]
    pub async fn find_or_create(&self, profile: &ProviderProfile) -> Result<User, UserError> {
        if profile.email.is_empty() {
            return Err(UserError::InvalidData(
                "Provider profile has no email".to_string(),
            ));
        }

        if let Some(user) = self.users.find_by_email(&profile.email).await? {
            tracing::debug!(user_id = user.id, "Existing user");
            return Ok(user);
        }

        let new_user = NewUser::new(profile.name.clone(), profile.email.clone());
        match self.users.insert(new_user).await {
            Ok(user) => {
                tracing::info!(user_id = user.id, "Provisioned new user");
                Ok(user)
            }
            Err(UserError::ConstraintViolation(msg)) => {
                tracing::debug!("Lost user creation race, retrying lookup");
                self.users
                    .find_by_email(&profile.email)
                    .await?
                    .ok_or(UserError::ConstraintViolation(msg))
            }
            Err(e) => Err(e),
        }
    }
}
