//! Local fallback generator
//!
//! Supportive canned answers chosen by keyword and revealed with a paced
//! typing effect. Used whenever no hosted provider produced an answer.

mod pacing;
mod responder;
mod templates;

pub use pacing::{PacingConfig, typing_stream};
pub use responder::FallbackResponder;
pub use templates::TemplateKind;
