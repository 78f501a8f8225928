//! Unified error types for the contact relay.
//!
//! Every failure in the submission pipeline maps to exactly one variant,
//! and each variant to exactly one HTTP status via [`Error::http_status`].
//! Adding a variant forces that match to be updated.
//!
//! `Delivery`, `Verification`, and `Internal` carry operator-side detail
//! that is logged and never returned to the caller.

use thiserror::Error;

use crate::submission::FieldErrors;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the contact relay.
#[derive(Debug, Error)]
pub enum Error {
    /// Client exceeded the per-key submission quota.
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// Request body could not be decoded as a submission.
    #[error("malformed request: {0}")]
    Malformed(String),

    /// One or more submission fields violated the structural rules.
    #[error("validation failed: {0}")]
    Validation(FieldErrors),

    /// CAPTCHA verification service rejected the token.
    #[error("verification failed: {0}")]
    Verification(String),

    /// Email delivery service refused or failed the send.
    #[error("delivery failed: {0}")]
    Delivery(String),

    /// Anything unanticipated. Always surfaced as a generic 500.
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn rate_limited(msg: impl Into<String>) -> Self {
        Self::RateLimited(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }

    pub fn verification(msg: impl Into<String>) -> Self {
        Self::Verification(msg.into())
    }

    pub fn delivery(msg: impl Into<String>) -> Self {
        Self::Delivery(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Get the HTTP status code for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::RateLimited(_) => 429,
            Self::Malformed(_) => 400,
            Self::Validation(_) => 400,
            Self::Verification(_) => 400,
            Self::Delivery(_) => 500,
            Self::Internal(_) => 500,
        }
    }
}
