//! Typing-effect pacing

use futures::Stream;
use futures::stream;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Delays of the simulated typing effect
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    /// Pause before the first character
    #[serde(with = "humantime_serde")]
    pub initial_delay: Duration,
    /// After an ordinary character
    #[serde(with = "humantime_serde")]
    pub base_delay: Duration,
    /// After `.`, `!` or `?`
    #[serde(with = "humantime_serde")]
    pub sentence_pause: Duration,
    /// After `,`, `;` or `:`
    #[serde(with = "humantime_serde")]
    pub clause_pause: Duration,
    /// After whitespace
    #[serde(with = "humantime_serde")]
    pub whitespace_pause: Duration,
    /// Upper bound for the whole emission
    #[serde(with = "humantime_serde")]
    pub deadline: Duration,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(500),
            base_delay: Duration::from_millis(30),
            sentence_pause: Duration::from_millis(300),
            clause_pause: Duration::from_millis(150),
            whitespace_pause: Duration::from_millis(50),
            deadline: Duration::from_secs(30),
        }
    }
}

impl PacingConfig {
    /// No delays at all
    pub fn instant() -> Self {
        Self {
            initial_delay: Duration::ZERO,
            base_delay: Duration::ZERO,
            sentence_pause: Duration::ZERO,
            clause_pause: Duration::ZERO,
            whitespace_pause: Duration::ZERO,
            deadline: Duration::from_secs(30),
        }
    }

    /// Pause following an emitted character
    pub fn delay_after(&self, ch: char) -> Duration {
        match ch {
            '.' | '!' | '?' => self.sentence_pause,
            ',' | ';' | ':' => self.clause_pause,
            c if c.is_whitespace() => self.whitespace_pause,
            _ => self.base_delay,
        }
    }

    /// Time to type `text` completely
    pub fn total_duration(&self, text: &str) -> Duration {
        let mut chars = text.chars().peekable();
        let mut total = if chars.peek().is_some() {
            self.initial_delay
        } else {
            Duration::ZERO
        };
        while let Some(ch) = chars.next() {
            if chars.peek().is_some() {
                total += self.delay_after(ch);
            }
        }
        total
    }
}

struct TypingState {
    chars: Vec<char>,
    next: usize,
    current: String,
    pacing: PacingConfig,
}

/// Cumulative prefixes of `text`, one character longer each time.
///
/// The pause before each item depends on the character emitted just before
/// it. The stream ends after the full text.
pub fn typing_stream(text: &str, pacing: &PacingConfig) -> impl Stream<Item = String> + Send + 'static {
    let state = TypingState {
        chars: text.chars().collect(),
        next: 0,
        current: String::with_capacity(text.len()),
        pacing: pacing.clone(),
    };

    stream::unfold(state, |mut state| async move {
        let ch = *state.chars.get(state.next)?;
        let delay = match state.next {
            0 => state.pacing.initial_delay,
            i => state.pacing.delay_after(state.chars[i - 1]),
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        state.current.push(ch);
        state.next += 1;
        let prefix = state.current.clone();
        Some((prefix, state))
    })
}
