//! Fixed supportive responses used when no provider answers

/// Which canned response fits the user's message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKind {
    Anxiety,
    Sadness,
    General,
}

const ANXIETY: &str = "I hear you're feeling anxious. Let's slow this down.\n\
\n\
**3 things to focus on:**\n\
1. **Breathe slowly** - 4 counts in, 6 counts out\n\
2. **Ground yourself** - name 3 things you can see right now  \n\
3. **One small step** - what's one tiny thing you can do for yourself today?\n\
\n\
What feels possible right now?";

const SADNESS: &str = "I see you're carrying sadness. That's heavy.\n\
\n\
**3 things to remember:**\n\
1. **This feeling will shift** - even if it doesn't feel that way\n\
2. **Small counts** - getting through today is enough\n\
3. **You're not alone** - reaching out shows strength\n\
\n\
What's one small way you're caring for yourself today?";

const GENERAL: &str = "I hear you. What you're sharing takes courage.\n\
\n\
**3 things to hold onto:**\n\
1. **Your feelings are valid** - no matter what they are\n\
2. **One moment at a time** - that's all we need to manage\n\
3. **You matter** - your wellbeing is important\n\
\n\
What feels most needed right now - someone to listen, practical help, or time to think?";

impl TemplateKind {
    /// Pick a template from the latest user message.
    ///
    /// Case-insensitive substring checks; anxiety wins over sadness.
    pub fn select(message: &str) -> Self {
        let lower = message.to_lowercase();
        if lower.contains("anxiety") || lower.contains("panic") {
            TemplateKind::Anxiety
        } else if lower.contains("sad") || lower.contains("depression") {
            TemplateKind::Sadness
        } else {
            TemplateKind::General
        }
    }

    pub fn text(&self) -> &'static str {
        match self {
            TemplateKind::Anxiety => ANXIETY,
            TemplateKind::Sadness => SADNESS,
            TemplateKind::General => GENERAL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_order() {
        assert_eq!(TemplateKind::select("My PANIC is back"), TemplateKind::Anxiety);
        assert_eq!(
            TemplateKind::select("anxiety and depression together"),
            TemplateKind::Anxiety
        );
        assert_eq!(TemplateKind::select("I've been so sad lately"), TemplateKind::Sadness);
        assert_eq!(TemplateKind::select("Depression again"), TemplateKind::Sadness);
        assert_eq!(TemplateKind::select("I feel stuck"), TemplateKind::General);
        assert_eq!(TemplateKind::select(""), TemplateKind::General);
    }

    #[test]
    fn test_template_text() {
        assert!(ANXIETY.starts_with("I hear you're feeling anxious. Let's slow this down.\n\n"));
        assert!(ANXIETY.contains("see right now  \n3."));
        assert!(SADNESS.ends_with("What's one small way you're caring for yourself today?"));
        assert!(GENERAL.contains("\n2. **One moment at a time** - that's all we need to manage\n"));
        assert_eq!(TemplateKind::General.text(), GENERAL);
    }
}
