//! Advisory moderation of generated text.

/// Terms flagged when no list is configured.
pub const DEFAULT_BANNED_TERMS: &[&str] = &[
    "violence",
    "hate",
    "racist",
    "drugs",
    "porn",
    "scam",
    "weapon",
    "kill",
];

/// Case-insensitive substring filter over an immutable denylist.
///
/// A flag is metadata for human review, never a rejection.
#[derive(Debug, Clone)]
pub struct ModerationFilter {
    terms: Vec<String>,
}

impl ModerationFilter {
    /// Build a filter. Terms are lowercased; blank terms are ignored.
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let terms = terms
            .into_iter()
            .map(|t| t.as_ref().trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        Self { terms }
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn is_flagged(&self, text: &str) -> bool {
        if self.terms.is_empty() {
            return false;
        }
        let text = text.to_lowercase();
        self.terms.iter().any(|term| text.contains(term.as_str()))
    }
}

impl Default for ModerationFilter {
    fn default() -> Self {
        Self::new(DEFAULT_BANNED_TERMS)
    }
}
