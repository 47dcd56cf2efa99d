//! HTTP error response conversion
//!
//! Maps `AppError` onto the service's fixed response envelope. Internal
//! failures all collapse to the same generic 500 body; detail is logged
//! server-side and never returned to the caller, so a database outage, a
//! full disk, and a malformed upload are indistinguishable from outside.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use intake_core::error::LogLevel;
use intake_core::AppError;
use serde::Serialize;

pub const GENERIC_ERROR_MESSAGE: &str = "An unexpected error occurred";
pub const NOT_FOUND_MESSAGE: &str = "Endpoint not found";

/// Body of every non-success response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Wrapper type for AppError to implement IntoResponse.
/// Needed because of the orphan rule: IntoResponse is external and AppError
/// lives in intake-core.
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Request failed");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type = error_type, "Request failed");
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;
        log_error(app_error);

        let (status, message) = match app_error {
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE),
            // Everything else reads as the same internal failure.
            _ => (StatusCode::INTERNAL_SERVER_ERROR, GENERIC_ERROR_MESSAGE),
        };

        (status, Json(ErrorBody::new(message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = HttpAppError(err).into_response();
        let status = response.status();
        let body = read_json(response);
        (status, body)
    }

    fn read_json(response: Response) -> serde_json::Value {
        let bytes = tokio::runtime::Builder::new_current_thread()
            .build()
            .expect("runtime")
            .block_on(axum::body::to_bytes(response.into_body(), usize::MAX))
            .expect("body");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[test]
    fn internal_failures_collapse_to_generic_500() {
        for err in [
            AppError::Storage("disk full".to_string()),
            AppError::Multipart("truncated stream".to_string()),
            AppError::Conflict("email taken".to_string()),
            AppError::PayloadTooLarge("21 MiB".to_string()),
            AppError::Internal("boom".to_string()),
        ] {
            let (status, body) = render(err);
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(body["success"], false);
            assert_eq!(body["message"], GENERIC_ERROR_MESSAGE);
        }
    }

    #[test]
    fn not_found_keeps_its_own_status_and_message() {
        let (status, body) = render(AppError::NotFound("/api/nope".to_string()));
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], NOT_FOUND_MESSAGE);
    }
}
