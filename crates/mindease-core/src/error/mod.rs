//! Error types for MindEase
//!
//! A single error enum is shared by the provider clients, the router and the
//! configuration layer. The router decides between absorbing an error (and
//! falling back to the offline responder) or propagating it by asking
//! [`ChatError::is_recoverable`].

mod constructors;
mod sanitize;
mod types;
mod user_messages;

pub use sanitize::sanitize_provider_error_text;
pub use types::{ChatError, ChatResult};
pub use user_messages::UserFriendlyError;
