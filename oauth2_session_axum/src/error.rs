use http::StatusCode;
use oauth2_session::CoordinationError;

const SIGN_IN_FAILED: &str = "Sign-in failed. Please try again.";

/// Helper trait for converting errors to a standard response error format
pub trait IntoResponseError<T> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)>;
}

/// Every coordination failure is a server-side failure from the browser's
/// point of view; details stay in the log.
impl<T> IntoResponseError<T> for Result<T, CoordinationError> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)> {
        self.map_err(|e| {
            tracing::debug!("Responding 500 for: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, SIGN_IN_FAILED.to_string())
        })
    }
}

/// Implementation for askama rendering errors
impl<T> IntoResponseError<T> for Result<T, askama::Error> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)> {
        self.map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
    }
}
