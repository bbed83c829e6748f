//! Unified error handling with Sentry integration.
//!
//! Every domain error is converted to a fixed status and body here, at the
//! boundary. Server-side failures are additionally captured to Sentry inside
//! `into_response`; the Sentry transport ships events in the background, so
//! the client gets its response even when the reporting hook is slow or down.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::services::UserServiceError;

/// Application-level error type for the user service.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Lifecycle operation failed.
    #[error("service error: {0}")]
    Service(#[from] UserServiceError),

    /// Request input failed validation.
    #[error("validation error: {0}")]
    Validation(String),

    /// No credential was presented.
    #[error("not authenticated: {0}")]
    Unauthenticated(String),

    /// Credential invalid, or subject does not own the resource.
    #[error("not authorized: {0}")]
    Forbidden(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Service(err) => match err {
                // Uniqueness conflicts surface as plain client errors.
                UserServiceError::Conflict => StatusCode::BAD_REQUEST,
                UserServiceError::NotFound => StatusCode::NOT_FOUND,
                UserServiceError::NoEffect(_)
                | UserServiceError::Store(_)
                | UserServiceError::Credential(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
        }
    }

    /// Client-facing message. Internal details never leak here.
    fn client_message(&self) -> String {
        match self {
            Self::Service(err) => match err {
                UserServiceError::Conflict => "User with this email already exists".to_string(),
                UserServiceError::NotFound => "User not found".to_string(),
                UserServiceError::NoEffect(_)
                | UserServiceError::Store(_)
                | UserServiceError::Credential(_) => "An unexpected error occurred".to_string(),
            },
            Self::Validation(msg) | Self::Unauthenticated(msg) | Self::Forbidden(msg) => {
                msg.clone()
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let body = Json(json!({ "error": self.client_message() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::StoreError;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::Service(UserServiceError::Conflict).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Service(UserServiceError::NotFound).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Service(UserServiceError::NoEffect("no inserted record")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Service(UserServiceError::Store(StoreError::DataCorruption(
                "bad email".to_string()
            )))
            .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Validation("age must be between 0 and 150".to_string()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Unauthenticated("You are not authenticated!".to_string()).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Forbidden("You are not authorized!".to_string()).status(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_client_messages() {
        assert_eq!(
            ApiError::Service(UserServiceError::Conflict).client_message(),
            "User with this email already exists"
        );
        assert_eq!(
            ApiError::Service(UserServiceError::NotFound).client_message(),
            "User not found"
        );
        // Store details stay server-side.
        let internal = ApiError::Service(UserServiceError::Store(StoreError::DataCorruption(
            "row 7 has a bad email".to_string(),
        )));
        assert_eq!(internal.client_message(), "An unexpected error occurred");
    }
}
