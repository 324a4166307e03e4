use async_trait::async_trait;
use http::header::{ACCEPT, AUTHORIZATION};
use serde::Deserialize;
use url::Url;

use crate::config::AuthConfig;
use crate::session::StateToken;

use super::config::{
    HTTP_TIMEOUT, OAUTH2_AUTH_URL, OAUTH2_SCOPE, OAUTH2_TOKEN_URL, OAUTH2_USERINFO_URL, USER_AGENT,
};
use super::errors::OAuth2Error;
use super::types::{IdentityProvider, ProviderProfile, ProviderToken};

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GitHubUser {
    login: String,
    name: Option<String>,
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GitHubEmail {
    email: String,
    primary: bool,
    verified: bool,
}

/// GitHub OAuth App client.
pub struct GitHubProvider {
    client: reqwest::Client,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    auth_url: String,
    token_url: String,
    userinfo_url: String,
}

impl GitHubProvider {
    pub fn new(config: &AuthConfig) -> Result<Self, OAuth2Error> {
        let client = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| OAuth2Error::Client(e.to_string()))?;

        Ok(Self {
            client,
            client_id: config.github_client_id.clone(),
            client_secret: config.github_client_secret.clone(),
            redirect_uri: config.github_redirect_uri.clone(),
            auth_url: OAUTH2_AUTH_URL.clone(),
            token_url: OAUTH2_TOKEN_URL.clone(),
            userinfo_url: OAUTH2_USERINFO_URL.clone(),
        })
    }

    /// Point the token and user endpoints somewhere else, e.g. a GitHub Enterprise host.
    pub fn with_endpoints(
        mut self,
        auth_url: impl Into<String>,
        token_url: impl Into<String>,
        userinfo_url: impl Into<String>,
    ) -> Self {
        self.auth_url = auth_url.into();
        self.token_url = token_url.into();
        self.userinfo_url = userinfo_url.into();
        self
    }

    async fn fetch_primary_email(&self, access_token: &str) -> Result<String, OAuth2Error> {
        let response = self
            .client
            .get(format!("{}/emails", self.userinfo_url))
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, format!("token {access_token}"))
            .send()
            .await
            .map_err(|e| OAuth2Error::FetchUserInfo(e.to_string()))?;

        if !response.status().is_success() {
            return Err(OAuth2Error::FetchUserInfo(format!(
                "Email lookup returned {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| OAuth2Error::FetchUserInfo(e.to_string()))?;
        let emails: Vec<GitHubEmail> = serde_json::from_str(&body)?;

        emails
            .into_iter()
            .find(|e| e.primary && e.verified)
            .map(|e| e.email)
            .ok_or_else(|| {
                OAuth2Error::FetchUserInfo("No primary verified email on account".to_string())
            })
    }
}

#[async_trait]
impl IdentityProvider for GitHubProvider {
    fn authorize_url(&self, state: &StateToken) -> Result<String, OAuth2Error> {
        let url = Url::parse_with_params(
            &self.auth_url,
            &[
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("scope", OAUTH2_SCOPE),
                ("state", state.as_str()),
            ],
        )
        .map_err(|e| OAuth2Error::Client(format!("Invalid authorization URL: {e}")))?;
        Ok(url.into())
    }

    #[tracing::instrument(skip_all)]
    async fn exchange_code(&self, code: &str) -> Result<ProviderToken, OAuth2Error> {
        let response = self
            .client
            .post(&self.token_url)
            .header(ACCEPT, "application/json")
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("code", code),
                ("redirect_uri", self.redirect_uri.as_str()),
            ])
            .send()
            .await
            .map_err(|e| OAuth2Error::TokenExchange(e.to_string()))?;

        if !response.status().is_success() {
            tracing::debug!("Token Exchange Response: {:#?}", response);
            return Err(OAuth2Error::TokenExchange(response.status().to_string()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| OAuth2Error::TokenExchange(e.to_string()))?;
        let token: TokenResponse =
            serde_json::from_str(&body).map_err(|e| OAuth2Error::TokenExchange(e.to_string()))?;

        // GitHub reports a bad code with 200 and an error body
        match token {
            TokenResponse {
                access_token: Some(access_token),
                ..
            } if !access_token.is_empty() => Ok(ProviderToken { access_token }),
            TokenResponse {
                error,
                error_description,
                ..
            } => Err(OAuth2Error::TokenExchange(format!(
                "{}: {}",
                error.unwrap_or_else(|| "missing_access_token".to_string()),
                error_description.unwrap_or_default()
            ))),
        }
    }

    #[tracing::instrument(skip_all)]
    async fn fetch_profile(&self, access_token: &str) -> Result<ProviderProfile, OAuth2Error> {
        let response = self
            .client
            .get(&self.userinfo_url)
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, format!("token {access_token}"))
            .send()
            .await
            .map_err(|e| OAuth2Error::FetchUserInfo(e.to_string()))?;

        if !response.status().is_success() {
            return Err(OAuth2Error::FetchUserInfo(response.status().to_string()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| OAuth2Error::FetchUserInfo(e.to_string()))?;
        let user: GitHubUser = serde_json::from_str(&body)?;
        tracing::debug!(login = %user.login, "Fetched GitHub profile");

        let email = match user.email.filter(|e| !e.is_empty()) {
            Some(email) => email,
            None => self.fetch_primary_email(access_token).await?,
        };
        let name = user
            .name
            .filter(|n| !n.is_empty())
            .unwrap_or(user.login);

        Ok(ProviderProfile { name, email })
    }
}
