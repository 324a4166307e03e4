mod config;
mod errors;
mod github;
mod types;

pub use errors::OAuth2Error;
pub use github::GitHubProvider;
pub use types::{AuthResponse, IdentityProvider, ProviderProfile, ProviderToken};
