//! Constructor methods for ChatError

use super::types::ChatError;
use crate::llm::ProviderId;
use std::time::Duration;

impl ChatError {
    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            context: None,
        }
    }

    /// Create a configuration error with context
    pub fn config_with_context(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            context: Some(context.into()),
        }
    }

    /// Create a transport error
    pub fn http(message: impl Into<String>, url: Option<String>) -> Self {
        Self::Http {
            message: message.into(),
            url,
            status_code: None,
        }
    }

    /// Create a provider error
    pub fn provider(provider: ProviderId, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.display_name().to_string(),
            message: message.into(),
            status_code: None,
        }
    }

    /// Create a provider error carrying the HTTP status the upstream returned
    pub fn provider_with_status(
        provider: ProviderId,
        message: impl Into<String>,
        status_code: u16,
    ) -> Self {
        Self::Provider {
            provider: provider.display_name().to_string(),
            message: message.into(),
            status_code: Some(status_code),
        }
    }

    /// Create a stream error
    pub fn stream(message: impl Into<String>) -> Self {
        Self::Stream {
            message: message.into(),
        }
    }

    /// Create a JSON error
    pub fn json(message: impl Into<String>) -> Self {
        Self::Json {
            message: message.into(),
        }
    }

    /// Create a timeout error
    pub fn timeout(provider: ProviderId, after: Duration) -> Self {
        Self::Timeout {
            provider: provider.display_name().to_string(),
            millis: after.as_millis() as u64,
        }
    }

    /// Create an empty-response error
    pub fn empty_response(provider: ProviderId) -> Self {
        Self::EmptyResponse {
            provider: provider.display_name().to_string(),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_uses_display_name() {
        let err = ChatError::provider_with_status(ProviderId::DeepSeek, "bad gateway", 502);
        assert_eq!(err.to_string(), "DeepSeek error: bad gateway");
        assert_eq!(err.status_code(), Some(502));
        assert_eq!(err.error_code(), "PROVIDER_ERROR");
    }

    #[test]
    fn test_timeout_message() {
        let err = ChatError::timeout(ProviderId::Claude, Duration::from_secs(15));
        assert_eq!(err.to_string(), "Claude request timed out after 15000ms");
    }

    #[test]
    fn test_recoverable_classification() {
        assert!(ChatError::timeout(ProviderId::DeepSeek, Duration::from_secs(1)).is_recoverable());
        assert!(ChatError::empty_response(ProviderId::OpenAi).is_recoverable());
        assert!(ChatError::stream("reset").is_recoverable());
        assert!(ChatError::config("missing key").is_recoverable());
        assert!(!ChatError::Cancelled.is_recoverable());
        assert!(!ChatError::invalid_input("empty").is_recoverable());
    }
}
