//! Offline responder

use super::pacing::{PacingConfig, typing_stream};
use super::templates::TemplateKind;
use crate::error::{ChatError, ChatResult};
use crate::llm::{ChatMessage, PartialCallback, latest_user_message};
use futures::StreamExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Answers from fixed templates with a simulated typing effect.
///
/// Never performs network I/O.
#[derive(Debug, Clone, Default)]
pub struct FallbackResponder {
    pacing: PacingConfig,
}

impl FallbackResponder {
    pub fn new(pacing: PacingConfig) -> Self {
        Self { pacing }
    }

    pub fn pacing(&self) -> &PacingConfig {
        &self.pacing
    }

    /// The template that would be used for `messages`
    pub fn template_for(messages: &[ChatMessage]) -> TemplateKind {
        TemplateKind::select(latest_user_message(messages))
    }

    /// Produce the fallback answer.
    ///
    /// Without a callback the template is returned at once. With one, `""` is
    /// emitted first, then every prefix of the template.
    pub async fn respond(
        &self,
        messages: &[ChatMessage],
        on_partial: Option<&PartialCallback<'_>>,
    ) -> String {
        let never = CancellationToken::new();
        match self.respond_with_cancel(messages, on_partial, &never).await {
            Ok(text) => text,
            Err(_) => Self::template_for(messages).text().to_string(),
        }
    }

    /// Like [`respond`](Self::respond), aborting with [`ChatError::Cancelled`]
    /// once `cancel` fires.
    ///
    /// When the pacing deadline passes first, the text emitted so far is the
    /// answer. If nothing was emitted yet the whole template is emitted and
    /// returned.
    pub async fn respond_with_cancel(
        &self,
        messages: &[ChatMessage],
        on_partial: Option<&PartialCallback<'_>>,
        cancel: &CancellationToken,
    ) -> ChatResult<String> {
        let kind = Self::template_for(messages);
        let template = kind.text();
        debug!("Fallback responder using {:?} template", kind);

        let Some(on_partial) = on_partial else {
            if cancel.is_cancelled() {
                return Err(ChatError::Cancelled);
            }
            return Ok(template.to_string());
        };

        on_partial("");

        let typing = typing_stream(template, &self.pacing);
        futures::pin_mut!(typing);
        let deadline = tokio::time::sleep(self.pacing.deadline);
        tokio::pin!(deadline);

        let mut emitted = String::new();
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!("Fallback emission cancelled after {} bytes", emitted.len());
                    return Err(ChatError::Cancelled);
                }
                _ = &mut deadline => {
                    warn!(
                        "Fallback emission hit its {:?} deadline after {} of {} bytes",
                        self.pacing.deadline,
                        emitted.len(),
                        template.len()
                    );
                    if emitted.is_empty() {
                        on_partial(template);
                        return Ok(template.to_string());
                    }
                    return Ok(emitted);
                }
                next = typing.next() => match next {
                    Some(prefix) => {
                        on_partial(&prefix);
                        emitted = prefix;
                    }
                    None => return Ok(emitted),
                },
            }
        }
    }
}
