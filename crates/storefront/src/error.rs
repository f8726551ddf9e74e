//! Unified error handling with Sentry integration.
//!
//! Handlers return `Result<T, AppError>`; server errors are captured to
//! Sentry before the response is written.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::services::ShareError;

/// Application-level error type for the server.
#[derive(Debug, Error)]
pub enum AppError {
    /// Creating a share link failed.
    #[error("Share error: {0}")]
    Share(#[from] ShareError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::Share(ShareError::MissingStorefront) | Self::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Share(ShareError::Url(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Don't expose internal error details to clients
        let message = if status.is_server_error() {
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("preset z".to_string());
        assert_eq!(err.to_string(), "Not found: preset z");

        let err = AppError::from(ShareError::MissingStorefront);
        assert_eq!(
            err.to_string(),
            "Share error: a storefront identifier or preset is required"
        );
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            let response = err.into_response();
            response.status()
        }

        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(ShareError::MissingStorefront.into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(ShareError::Url(url::ParseError::EmptyHost).into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
