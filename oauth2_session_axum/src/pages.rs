use askama::Template;
use axum::{Router, http::StatusCode, response::Html, routing::get};

use oauth2_session::{AUTH_ROUTE_PREFIX, AuthCoordinator};

use super::error::IntoResponseError;

pub(super) fn router() -> Router<AuthCoordinator> {
    Router::new().route("/", get(login))
}

#[derive(Template)]
#[template(path = "login.j2")]
struct LoginTemplate<'a> {
    auth_route_prefix: &'a str,
}

async fn login() -> Result<Html<String>, (StatusCode, String)> {
    let template = LoginTemplate {
        auth_route_prefix: AUTH_ROUTE_PREFIX.as_str(),
    };
    Ok(Html(template.render().into_response_error()?))
}
