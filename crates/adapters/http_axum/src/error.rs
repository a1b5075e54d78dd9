//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use pageshell_domain::error::ShellError;

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`ShellError`] to an HTTP response with appropriate status code.
pub struct ApiError(ShellError);

impl From<ShellError> for ApiError {
    fn from(err: ShellError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            ShellError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            ShellError::NotFound(err) => (StatusCode::NOT_FOUND, err.to_string()),
            ShellError::Fetch(err) => {
                tracing::warn!(error = %err, "upstream catalog error");
                (StatusCode::BAD_GATEWAY, err.to_string())
            }
            ShellError::Load(err) => {
                tracing::error!(error = %err, "load error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
            ShellError::Storage(err) => {
                tracing::error!(error = %err, "storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
