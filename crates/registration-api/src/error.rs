//! Error types for the registration API.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use registration_core::RegistrationError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Registration(#[from] RegistrationError),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Registration(e @ RegistrationError::DuplicateEmail(_)) => {
                (StatusCode::CONFLICT, e.code())
            }
            ApiError::Registration(e @ RegistrationError::StorageUnavailable(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, e.code())
            }
            ApiError::Registration(e) => (StatusCode::BAD_REQUEST, e.code()),
            ApiError::RateLimitExceeded => (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMIT_EXCEEDED"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let body = ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(e: tokio::task::JoinError) -> Self {
        ApiError::Internal(format!("Background task failed: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ApiError::from(RegistrationError::InvalidName("too short".into())), StatusCode::BAD_REQUEST),
            (ApiError::from(RegistrationError::DuplicateEmail("a@b.com".into())), StatusCode::CONFLICT),
            (
                ApiError::from(RegistrationError::StorageUnavailable("disk full".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (ApiError::RateLimitExceeded, StatusCode::TOO_MANY_REQUESTS),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn test_codes() {
        let (_, code) =
            ApiError::from(RegistrationError::StorageUnavailable("disk full".into())).status_and_code();
        assert_eq!(code, "STORAGE_UNAVAILABLE");
    }
}
