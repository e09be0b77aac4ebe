//! HTTP error mapping shared by the provider clients

use crate::error::{ChatError, sanitize_provider_error_text};
use crate::llm::ProviderId;
use reqwest::Response;

/// Map a failed send into a transport error
pub(crate) fn send_error(provider: ProviderId, error: reqwest::Error) -> ChatError {
    let kind = if error.is_connect() {
        "connection failed"
    } else if error.is_timeout() {
        "request timed out"
    } else {
        "request failed"
    };
    ChatError::http(
        format!("{} {}: {}", provider.display_name(), kind, error),
        error.url().map(|u| u.to_string()),
    )
}

/// Pass successful responses through, turn the rest into errors
pub(crate) async fn check_status(provider: ProviderId, response: Response) -> Result<Response, ChatError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let detail = sanitize_provider_error_text(&body);
    tracing::debug!("{} returned HTTP {}: {}", provider, status, detail);
    Err(ChatError::provider_with_status(
        provider,
        format!("API error (status {}): {}", status.as_u16(), detail),
        status.as_u16(),
    ))
}

/// Map a failure to read or decode a successful response body
pub(crate) fn decode_error(provider: ProviderId, error: reqwest::Error) -> ChatError {
    if error.is_decode() {
        ChatError::json(format!("{} returned a malformed body: {}", provider.display_name(), error))
    } else {
        ChatError::stream(format!("{} body could not be read: {}", provider.display_name(), error))
    }
}
