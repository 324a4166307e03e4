use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::session::StateToken;

use super::errors::OAuth2Error;

/// Query parameters the provider appends to the callback URL.
///
/// Missing parameters decode as empty strings and fail the state check.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub state: String,
}

/// Provider access token obtained from an authorization code.
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderToken {
    pub access_token: String,
}

impl std::fmt::Debug for ProviderToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderToken")
            .field("access_token", &"[redacted]")
            .finish()
    }
}

/// Verified identity as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderProfile {
    pub name: String,
    pub email: String,
}

/// The provider side of the authorization-code flow.
#[async_trait]
pub trait IdentityProvider: Send + Sync + 'static {
    /// URL the browser is sent to, carrying `state`.
    fn authorize_url(&self, state: &StateToken) -> Result<String, OAuth2Error>;

    async fn exchange_code(&self, code: &str) -> Result<ProviderToken, OAuth2Error>;

    async fn fetch_profile(&self, access_token: &str) -> Result<ProviderProfile, OAuth2Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_response_missing_fields_default_to_empty() {
        let response: AuthResponse = serde_json::from_str(r#"{"code":"ABC"}"#).unwrap();
        assert_eq!(response.code, "ABC");
        assert_eq!(response.state, "");
    }

    #[test]
    fn test_provider_token_debug_redacted() {
        let token = ProviderToken {
            access_token: "gho_secret".to_string(),
        };
        assert!(!format!("{token:?}").contains("gho_secret"));
    }
}
