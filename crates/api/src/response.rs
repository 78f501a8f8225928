//! Standardized API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use relay_core::FieldErrors;
use serde::{Deserialize, Serialize};

/// Success response for an accepted submission.
#[derive(Debug, Serialize, Deserialize)]
pub struct ContactResponse {
    pub success: bool,
}

impl ContactResponse {
    pub fn accepted() -> Self {
        Self { success: true }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<FieldErrors>,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub mailer_healthy: bool,
    pub captcha_healthy: bool,
}

/// API error: a status code plus a client-safe body.
///
/// Constructors fix the client-visible message per outcome; underlying
/// causes stay in the logs.
pub struct ApiError {
    pub status: StatusCode,
    pub response: ErrorResponse,
}

impl ApiError {
    fn new(status: StatusCode, msg: impl Into<String>) -> Self {
        Self {
            status,
            response: ErrorResponse {
                error: msg.into(),
                details: None,
            },
        }
    }

    pub fn rate_limited() -> Self {
        Self::new(
            StatusCode::TOO_MANY_REQUESTS,
            "Too many requests. Please try again later.",
        )
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, msg)
    }

    pub fn validation(details: FieldErrors) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            response: ErrorResponse {
                error: "Invalid form data".to_string(),
                details: Some(details),
            },
        }
    }

    pub fn verification_failed() -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Verification failed")
    }

    /// Fixed generic body: internal causes are never echoed to callers.
    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Failed to send message")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

/// The single outcome-to-transport table. A new `relay_core::Error`
/// variant does not compile until it is mapped here.
impl From<relay_core::Error> for ApiError {
    fn from(err: relay_core::Error) -> Self {
        match err {
            relay_core::Error::RateLimited(_) => ApiError::rate_limited(),
            relay_core::Error::Malformed(_) => ApiError::bad_request("Invalid form data"),
            relay_core::Error::Validation(details) => ApiError::validation(details),
            relay_core::Error::Verification(_) => ApiError::verification_failed(),
            relay_core::Error::Delivery(_) => ApiError::internal(),
            relay_core::Error::Internal(_) => ApiError::internal(),
        }
    }
}
