//! Error types for the esign SDK.
//!
//! Every SDK operation returns [`EsignError`], which separates a malformed
//! call, a failed credential exchange, a network failure, an HTTP failure and
//! a business-level rejection reported inside the provider's envelope.

use thiserror::Error;

/// Result type for esign operations.
pub type Result<T> = std::result::Result<T, EsignError>;

/// Errors that can occur when using the esign SDK.
#[derive(Error, Debug)]
pub enum EsignError {
    /// A required argument was missing or malformed. Raised before any
    /// network call is made.
    #[error("Invalid request: {0}")]
    Validation(String),

    /// The app id / secret exchange for an access token failed.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Network-level failure, no response was received.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider answered with a non-2xx HTTP status.
    #[error("HTTP error ({status_code}): {message}")]
    Http {
        /// HTTP status code.
        status_code: u16,
        /// Message extracted from the body, or the status reason.
        message: String,
        /// Raw response body.
        body: String,
    },

    /// HTTP succeeded but the envelope signalled a business failure.
    #[error("Business error [{code}]: {message}")]
    Business {
        /// Provider error code.
        code: i64,
        /// Provider error message.
        message: String,
        /// Raw response body.
        body: String,
    },

    /// The response body could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),

    /// The client could not be configured.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl EsignError {
    /// Returns true if this is a retryable error.
    pub fn is_retryable(&self) -> bool {
        match self {
            EsignError::Transport(_) => true,
            EsignError::Http { status_code, .. } => *status_code >= 500,
            _ => false,
        }
    }

    /// Returns true if this is an authentication error.
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            EsignError::Auth(_)
                | EsignError::Http { status_code: 401, .. }
                | EsignError::Http { status_code: 403, .. }
        )
    }

    /// Returns the HTTP status code if available.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            EsignError::Http { status_code, .. } => Some(*status_code),
            EsignError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns the provider's business error code if available.
    pub fn business_code(&self) -> Option<i64> {
        match self {
            EsignError::Business { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// Fails with [`EsignError::Validation`] when a required argument is blank.
pub(crate) fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(EsignError::Validation(format!("{} is required", field)));
    }
    Ok(())
}
