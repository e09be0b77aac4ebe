//! Core error types

use thiserror::Error;

/// Result type alias for MindEase operations
pub type ChatResult<T> = Result<T, ChatError>;

/// Main error type for MindEase
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChatError {
    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        context: Option<String>,
    },

    /// Transport-level failures (connection refused, DNS, TLS, reset)
    #[error("HTTP error: {message}")]
    Http {
        message: String,
        url: Option<String>,
        status_code: Option<u16>,
    },

    /// The upstream answered, but with a failure status or an unusable body
    #[error("{provider} error: {message}")]
    Provider {
        provider: String,
        message: String,
        status_code: Option<u16>,
    },

    /// A stream broke after it was opened
    #[error("Stream error: {message}")]
    Stream { message: String },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {message}")]
    Json { message: String },

    /// The provider call lost the race against the routing timeout
    #[error("{provider} request timed out after {millis}ms")]
    Timeout { provider: String, millis: u64 },

    /// The provider completed without producing any text
    #[error("{provider} returned an empty response")]
    EmptyResponse { provider: String },

    /// The turn was cancelled by the caller
    #[error("Request was cancelled")]
    Cancelled,

    /// Invalid input errors
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },
}

impl ChatError {
    /// Stable code for logs and programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Config { .. } => "CONFIG_ERROR",
            Self::Http { .. } => "HTTP_ERROR",
            Self::Provider { .. } => "PROVIDER_ERROR",
            Self::Stream { .. } => "STREAM_ERROR",
            Self::Json { .. } => "JSON_ERROR",
            Self::Timeout { .. } => "TIMEOUT",
            Self::EmptyResponse { .. } => "EMPTY_RESPONSE",
            Self::Cancelled => "CANCELLED",
            Self::InvalidInput { .. } => "INVALID_INPUT",
        }
    }

    /// Whether the router may absorb this error by falling back to the
    /// offline responder.
    ///
    /// Everything a provider call can fail with is recoverable. Cancellation
    /// and caller mistakes are not.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Cancelled | Self::InvalidInput { .. })
    }

    /// HTTP status attached to the error, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status_code, .. } | Self::Provider { status_code, .. } => *status_code,
            _ => None,
        }
    }
}
