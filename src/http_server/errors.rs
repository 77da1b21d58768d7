//! HTTP Error Conversion
//!
//! Every failure leaves the service as `{"error": ..., "code": ...}`.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use crate::moderation::ModerationError;

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl From<&ModerationError> for ErrorResponse {
    fn from(err: &ModerationError) -> Self {
        Self {
            error: err.to_string(),
            code: err.status_code(),
        }
    }
}

impl IntoResponse for ModerationError {
    fn into_response(self) -> Response {
        if !self.is_client_error() {
            error!(error = %self, "request failed");
        }

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(ErrorResponse::from(&self))).into_response()
    }
}

impl From<JsonRejection> for ModerationError {
    fn from(rejection: JsonRejection) -> Self {
        ModerationError::InvalidInput(rejection.body_text())
    }
}

impl From<PathRejection> for ModerationError {
    fn from(rejection: PathRejection) -> Self {
        ModerationError::InvalidInput(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_response_status() {
        let response = ModerationError::Conflict.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_error_body_carries_code() {
        let err = ModerationError::InvalidStatus("sold".to_string());
        let body = ErrorResponse::from(&err);
        assert_eq!(body.code, 400);
        assert!(body.error.contains("sold"));
    }
}
