//! Keyword heuristic for picking a provider
//!
//! Pure and stateless. Scores the latest user message against two keyword
//! sets and a few shape signals, then maps the winning category to a
//! confidence in `[0.6, 0.9]`.

use super::types::{Classification, MessageCategory};

const COMPLEX_INDICATORS: &[&str] = &[
    "trauma",
    "abuse",
    "complex",
    "philosophy",
    "meaning",
    "existential",
    "grief",
    "loss",
    "death",
    "guilt",
    "shame",
    "identity",
    "values",
    "deep",
    "profound",
    "spiritual",
    "overwhelming",
    "complicated",
    "conflicted",
    "nuanced",
    "ambiguous",
    "struggling with who",
    "don't know who i am",
    "purpose",
    "why am i here",
];

const PRACTICAL_INDICATORS: &[&str] = &[
    "anxiety",
    "panic",
    "stress",
    "worried",
    "technique",
    "strategy",
    "practical",
    "help me",
    "what should i do",
    "how can i",
    "coping",
    "manage",
    "control",
    "organize",
    "routine",
    "habit",
    "depression",
    "sad",
    "motivation",
    "energy",
    "sleep",
    "appetite",
    "work",
    "school",
    "relationship",
    "social",
    "communication",
    "angry",
    "frustrated",
    "overwhelmed",
    "specific problem",
];

const LONG_MESSAGE_CHARS: usize = 200;
const TIE_BREAK_CHARS: usize = 150;
const BASE_CONFIDENCE: f64 = 0.6;
const MAX_CONFIDENCE: f64 = 0.9;
const CONFIDENCE_PER_POINT: f64 = 0.1;

pub const COMPLEX_REASON: &str =
    "Message indicates complex emotional processing or philosophical inquiry";
pub const PRACTICAL_REASON: &str =
    "Message indicates need for practical advice or structured support";
pub const LONG_TIE_REASON: &str = "Longer message suggesting complex emotional content";
pub const SHORT_TIE_REASON: &str = "Shorter message suggesting practical question";

fn count_matches(text: &str, indicators: &[&str]) -> f64 {
    indicators.iter().filter(|kw| text.contains(*kw)).count() as f64
}

/// Classify a message as complex or practical
pub fn classify(message: &str) -> Classification {
    let lower = message.to_lowercase();
    let length = message.chars().count();

    let mut complex = count_matches(&lower, COMPLEX_INDICATORS);
    let mut practical = count_matches(&lower, PRACTICAL_INDICATORS);

    if length > LONG_MESSAGE_CHARS {
        complex += 1.0;
    }
    if message.matches('?').count() >= 2 {
        practical += 1.0;
    }
    // "feeling" contains "feel", so a single check covers both
    if lower.contains("feel") {
        complex += 0.5;
    }
    if lower.contains("think") || lower.contains("should") {
        practical += 0.5;
    }

    let gap_confidence =
        |gap: f64| (BASE_CONFIDENCE + gap * CONFIDENCE_PER_POINT).min(MAX_CONFIDENCE);

    let (category, confidence, reason) = if complex > practical {
        (MessageCategory::Complex, gap_confidence(complex - practical), COMPLEX_REASON)
    } else if practical > complex {
        (
            MessageCategory::Practical,
            gap_confidence(practical - complex),
            PRACTICAL_REASON,
        )
    } else if length > TIE_BREAK_CHARS {
        (MessageCategory::Complex, BASE_CONFIDENCE, LONG_TIE_REASON)
    } else {
        (MessageCategory::Practical, BASE_CONFIDENCE, SHORT_TIE_REASON)
    };

    Classification {
        category,
        complex_score: complex,
        practical_score: practical,
        confidence,
        reason,
    }
}
