use askama::Template;
use axum::{
    extract::{Multipart, State},
    http::{StatusCode, header::CONTENT_TYPE},
    response::{Html, IntoResponse, Response},
};
use std::sync::Arc;

use oauth2_session_axum::{AUTH_ROUTE_PREFIX, AuthCoordinator, AuthUser, IntoResponseError};

use crate::transcode::ImageTranscoder;

pub(crate) const MAX_UPLOAD_SIZE: usize = 10 * 1024 * 1024;
const UPLOAD_FIELD: &str = "file";
const TOO_LARGE: &str = "The uploaded file should be no more than 10MB";

#[derive(Template)]
#[template(path = "index.j2")]
struct IndexTemplate<'a> {
    full_name: &'a str,
    email: &'a str,
    auth_route_prefix: &'a str,
}

pub(crate) async fn index(
    State(auth): State<AuthCoordinator>,
    user: AuthUser,
) -> Result<Html<String>, (StatusCode, String)> {
    let Some(record) = auth.find_user(&user.email).await.into_response_error()? else {
        // Session outlived its user row
        tracing::warn!("No user record for session email {}", user.email);
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            "User not found".to_string(),
        ));
    };

    let template = IndexTemplate {
        full_name: &record.full_name,
        email: &record.email,
        auth_route_prefix: AUTH_ROUTE_PREFIX.as_str(),
    };
    Ok(Html(template.render().into_response_error()?))
}

pub(crate) async fn upload(
    State(transcoder): State<Arc<dyn ImageTranscoder>>,
    user: AuthUser,
    mut multipart: Multipart,
) -> Result<Response, (StatusCode, String)> {
    let input = loop {
        let field = multipart.next_field().await.map_err(|e| {
            tracing::debug!("Rejecting upload: {}", e);
            (StatusCode::BAD_REQUEST, TOO_LARGE.to_string())
        })?;
        let Some(field) = field else {
            return Err((
                StatusCode::BAD_REQUEST,
                format!("Missing form field: {UPLOAD_FIELD}"),
            ));
        };
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        break field.bytes().await.map_err(|e| {
            tracing::debug!("Rejecting upload: {}", e);
            (StatusCode::BAD_REQUEST, TOO_LARGE.to_string())
        })?;
    };

    tracing::info!("{} uploaded {} bytes", user.email, input.len());

    let content_type = transcoder.content_type();
    let output = tokio::task::spawn_blocking(move || transcoder.transcode(&input))
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .map_err(|e| {
            tracing::debug!("Transcoding failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;

    Ok(([(CONTENT_TYPE, content_type)], output).into_response())
}
