use serde::{Deserialize, Serialize};

/// One normalized draft returned by the content generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedPost {
    pub text: String,
    pub hashtags: Vec<String>,
    pub image_prompt: Option<String>,
}

impl GeneratedPost {
    /// A draft carrying only text, with no hashtags or image prompt.
    pub fn text_only(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            hashtags: Vec::new(),
            image_prompt: None,
        }
    }
}

/// Bounds applied to the number of drafts requested per generation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationPolicy {
    default_count: usize,
    max_count: usize,
}

impl GenerationPolicy {
    pub const DEFAULT_COUNT: usize = 5;
    pub const MIN_CEILING: usize = 7;
    pub const MAX_CEILING: usize = 10;

    /// The ceiling is kept within 7–10 and the default within 1..=ceiling.
    pub fn new(default_count: usize, max_count: usize) -> Self {
        let max_count = max_count.clamp(Self::MIN_CEILING, Self::MAX_CEILING);
        Self {
            default_count: default_count.clamp(1, max_count),
            max_count,
        }
    }

    pub fn default_count(&self) -> usize {
        self.default_count
    }

    pub fn max_count(&self) -> usize {
        self.max_count
    }

    /// Resolve a caller-supplied count. Absent or non-positive means default.
    pub fn clamp(&self, requested: Option<i64>) -> usize {
        match requested {
            Some(n) if n > 0 => usize::try_from(n)
                .unwrap_or(self.max_count)
                .min(self.max_count),
            _ => self.default_count,
        }
    }
}

impl Default for GenerationPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_COUNT, Self::MAX_CEILING)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_uses_default_for_missing_or_non_positive() {
        let policy = GenerationPolicy::default();
        assert_eq!(policy.clamp(None), 5);
        assert_eq!(policy.clamp(Some(0)), 5);
        assert_eq!(policy.clamp(Some(-4)), 5);
    }

    #[test]
    fn test_clamp_caps_at_ceiling() {
        let policy = GenerationPolicy::new(5, 7);
        assert_eq!(policy.clamp(Some(3)), 3);
        assert_eq!(policy.clamp(Some(7)), 7);
        assert_eq!(policy.clamp(Some(50)), 7);
        assert_eq!(policy.clamp(Some(i64::MAX)), 7);
    }

    #[test]
    fn test_ceiling_is_kept_in_range() {
        assert_eq!(GenerationPolicy::new(5, 2).max_count(), 7);
        assert_eq!(GenerationPolicy::new(5, 40).max_count(), 10);
        assert_eq!(GenerationPolicy::new(0, 8).default_count(), 1);
        assert_eq!(GenerationPolicy::new(12, 8).default_count(), 8);
    }
}
