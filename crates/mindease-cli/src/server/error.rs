//! Error responses of the proxy endpoints

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

pub const MESSAGES_REQUIRED: &str = "Messages are required";
pub const UPSTREAM_FAILED: &str = "Internal Server Error forwarding to AI";

/// Failures reported before any body bytes are written
#[derive(Debug)]
pub enum AppError {
    /// The request body carries no usable `messages` list
    MessagesRequired,
    /// The upstream provider failed before producing any text
    Upstream,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::MessagesRequired => (StatusCode::BAD_REQUEST, MESSAGES_REQUIRED),
            AppError::Upstream => (StatusCode::INTERNAL_SERVER_ERROR, UPSTREAM_FAILED),
        };

        let body = Json(serde_json::json!({ "error": message }));
        (status, body).into_response()
    }
}
