//! User-facing error presentation
//!
//! The router absorbs every recoverable failure, so the only errors a chat
//! front end ever shows are the rare fatal ones. They all collapse into the
//! same generic retry prompt; the technical detail stays in the logs.

use super::types::ChatError;

/// Title and body shown to the user when a turn fails
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserFriendlyError {
    /// Short title (toast heading)
    pub title: String,
    /// Message body
    pub message: String,
    /// Whether sending the message again may help
    pub retryable: bool,
    /// Technical error code
    pub error_code: String,
}

impl ChatError {
    /// Convert to the message a chat front end should display
    pub fn to_user_friendly(&self) -> UserFriendlyError {
        let (title, message, retryable) = match self {
            ChatError::Cancelled => ("Cancelled", "The response was stopped.", true),
            ChatError::InvalidInput { .. } => {
                ("Nothing to send", "Type a message before sending.", false)
            }
            _ => ("Error", "Failed to get a response. Please try again.", true),
        };

        UserFriendlyError {
            title: title.to_string(),
            message: message.to_string(),
            retryable,
            error_code: self.error_code().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ProviderId;

    #[test]
    fn test_generic_retry_prompt() {
        let friendly = ChatError::provider(ProviderId::DeepSeek, "boom").to_user_friendly();
        assert_eq!(friendly.title, "Error");
        assert_eq!(friendly.message, "Failed to get a response. Please try again.");
        assert!(friendly.retryable);
        assert_eq!(friendly.error_code, "PROVIDER_ERROR");
    }

    #[test]
    fn test_cancelled_message() {
        let friendly = ChatError::Cancelled.to_user_friendly();
        assert_eq!(friendly.title, "Cancelled");
    }
}
