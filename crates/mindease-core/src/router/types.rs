//! Routing data types

use crate::llm::ProviderId;
use serde::{Deserialize, Serialize};

/// Which provider answered (or was chosen to answer) a turn, and why
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingDecision {
    pub chosen_provider: ProviderId,
    pub reason: String,
    /// Always within `[0, 1]`
    pub confidence: f64,
}

impl RoutingDecision {
    pub fn new(chosen_provider: ProviderId, reason: impl Into<String>, confidence: f64) -> Self {
        let confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
        Self {
            chosen_provider,
            reason: reason.into(),
            confidence,
        }
    }

    /// Confidence as a whole percentage, for display
    pub fn confidence_percent(&self) -> u8 {
        (self.confidence * 100.0).round() as u8
    }
}

/// Called once per turn as soon as a provider has been selected
pub type DecisionCallback<'a> = dyn Fn(&RoutingDecision) + Send + Sync + 'a;

/// Broad kind of support a message asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageCategory {
    /// Emotional processing, trauma, existential questions
    Complex,
    /// Coping techniques, structured advice
    Practical,
}

impl std::fmt::Display for MessageCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageCategory::Complex => f.write_str("complex"),
            MessageCategory::Practical => f.write_str("practical"),
        }
    }
}

/// Result of classifying one message
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub category: MessageCategory,
    pub complex_score: f64,
    pub practical_score: f64,
    pub confidence: f64,
    pub reason: &'static str,
}

/// Provider selection policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SelectionMode {
    /// Classify each message and pick the matching provider
    #[default]
    Heuristic,
    /// Always use one provider. `Local` forces offline answers.
    Pinned(ProviderId),
}

impl std::fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectionMode::Heuristic => f.write_str("heuristic"),
            SelectionMode::Pinned(id) => write!(f, "pinned:{}", id),
        }
    }
}

impl std::str::FromStr for SelectionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("heuristic") {
            return Ok(SelectionMode::Heuristic);
        }
        match s.split_once(':') {
            Some((mode, provider)) if mode.trim().eq_ignore_ascii_case("pinned") => {
                Ok(SelectionMode::Pinned(provider.parse()?))
            }
            _ => Err(format!(
                "Invalid selection mode '{}', expected 'heuristic' or 'pinned:<provider>'",
                s
            )),
        }
    }
}

impl TryFrom<String> for SelectionMode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SelectionMode> for String {
    fn from(mode: SelectionMode) -> Self {
        mode.to_string()
    }
}
