//! Error types for AppQoS operations.
//!
//! Every operation fails with one [`Error`]. Variants separate failures that
//! happened before a response arrived from responses the service rejected, so
//! callers can decide for themselves what is worth retrying.

use thiserror::Error;

/// Main error type for AppQoS operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Connection or IO failure before a response was obtained
    #[error("Transport error: {0}")]
    Transport(String),

    /// The request deadline elapsed
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Response body is not valid JSON or does not match the expected shape
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// Request payload could not be serialised
    #[error("Failed to encode request: {0}")]
    Encode(String),

    /// Response status differs from the documented success code
    #[error("Request rejected with status {status}: {body}")]
    RequestRejected {
        /// HTTP status code returned by the service
        status: u16,
        /// Raw response body text
        body: String,
    },

    /// Requested resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Base URL or resource path cannot be used
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Specialized result type for AppQoS operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns the error code for this error type.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Transport(_) => "TRANSPORT_ERROR",
            Self::Timeout(_) => "TIMEOUT",
            Self::Decode(_) => "DECODE_ERROR",
            Self::Encode(_) => "ENCODE_ERROR",
            Self::RequestRejected { .. } => "REQUEST_REJECTED",
            Self::NotFound(_) => "NOT_FOUND",
            Self::InvalidEndpoint(_) => "INVALID_ENDPOINT",
            Self::Config(_) => "CONFIG_ERROR",
        }
    }

    /// HTTP status code carried by this error, when a response was received.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::RequestRejected { status, .. } => Some(*status),
            Self::NotFound(_) => Some(404),
            _ => None,
        }
    }

    /// Returns true when no response was obtained from the service.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Timeout(_))
    }
}

// Conversions from external error types
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidEndpoint(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Config(err.to_string())
    }
}
