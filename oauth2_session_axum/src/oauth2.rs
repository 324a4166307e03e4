use axum::{
    Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::Redirect,
    routing::get,
};

use oauth2_session::{AuthCoordinator, AuthResponse};

use super::config::{AUTH_LOGIN_URL, AUTH_REDIRECT_USER};
use super::error::IntoResponseError;

pub(super) fn router() -> Router<AuthCoordinator> {
    Router::new()
        .route("/github", get(github_auth))
        .route("/github/callback", get(github_callback))
        .route("/logout", get(logout))
}

async fn github_auth(
    State(auth): State<AuthCoordinator>,
) -> Result<Redirect, (StatusCode, String)> {
    let auth_url = auth.start_login().await.into_response_error()?;
    Ok(Redirect::to(&auth_url))
}

async fn github_callback(
    State(auth): State<AuthCoordinator>,
    Query(auth_response): Query<AuthResponse>,
) -> Result<(HeaderMap, Redirect), (StatusCode, String)> {
    let (headers, user) = auth
        .complete_login(&auth_response)
        .await
        .into_response_error()?;
    tracing::debug!(user_id = user.id, "Redirecting signed-in user");
    Ok((headers, Redirect::to(AUTH_REDIRECT_USER.as_str())))
}

async fn logout(
    State(auth): State<AuthCoordinator>,
    headers: HeaderMap,
) -> Result<(HeaderMap, Redirect), (StatusCode, String)> {
    let headers = auth.logout(&headers).await.into_response_error()?;
    Ok((headers, Redirect::to(AUTH_LOGIN_URL.as_str())))
}
