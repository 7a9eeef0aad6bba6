//! Content generation: brand profile + count in, normalized drafts out.

use std::fmt::Write as _;
use std::sync::Arc;

use serde_json::Value;

use crate::domain::{BrandProfile, GeneratedPost};
use crate::error::GenerationError;
use crate::ports::TextGenerator;

/// Turns a brand profile into draft posts through a [`TextGenerator`].
#[derive(Clone)]
pub struct ContentGenerator {
    capability: Arc<dyn TextGenerator>,
}

impl ContentGenerator {
    pub fn new(capability: Arc<dyn TextGenerator>) -> Self {
        Self { capability }
    }

    /// Request `count` drafts. `count` must already be clamped by the caller.
    ///
    /// Capability failures propagate. Output that is not the expected JSON
    /// array degrades to a single draft carrying the raw text.
    pub async fn generate(
        &self,
        profile: &BrandProfile,
        count: usize,
    ) -> Result<Vec<GeneratedPost>, GenerationError> {
        let prompt = build_prompt(profile, count);
        let raw = self.capability.complete(&prompt).await?;
        let drafts = parse_completion(&raw, count);

        tracing::debug!(
            organization_id = %profile.organization_id,
            requested = count,
            returned = drafts.len(),
            "Content generated"
        );

        Ok(drafts)
    }
}

/// Compose the instruction sent to the text generator.
pub fn build_prompt(profile: &BrandProfile, count: usize) -> String {
    let mut prompt =
        String::from("You are a social media copywriter working for the brand described below.\n\n");

    prompt.push_str("Brand profile:\n");
    let fields = profile.fields();
    if fields.is_empty() {
        prompt.push_str("- (no details provided)\n");
    }
    for (label, value) in fields {
        let _ = writeln!(prompt, "- {label}: {value}");
    }

    let _ = write!(
        prompt,
        "\nWrite exactly {count} social media posts for this brand, in the language and \
         tone implied by the profile.\n\
         Respond with a JSON array only, without commentary. Each element must have the shape:\n\
         {{\"text\": \"<post body>\", \"hashtags\": [\"#tag\"], \"imagePrompt\": \"<short description of an accompanying image>\"}}\n"
    );

    prompt
}

/// Remove one leading and one trailing markdown code fence.
pub fn strip_code_fence(raw: &str) -> &str {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix("```") {
        // Drop the info string, e.g. "json".
        text = match rest.find('\n') {
            Some(pos) => &rest[pos + 1..],
            None => strip_json_tag(rest),
        };
    }
    if let Some(rest) = text.trim_end().strip_suffix("```") {
        text = rest;
    }

    text.trim()
}

/// Drop a `json` info tag on a single-line fence; any other text is content.
fn strip_json_tag(rest: &str) -> &str {
    match rest.get(..4) {
        Some(tag) if tag.eq_ignore_ascii_case("json") => {
            let after = &rest[4..];
            match after.chars().next() {
                Some(c) if c.is_whitespace() || c == '[' || c == '{' => after,
                _ => rest,
            }
        }
        _ => rest,
    }
}

/// Parse raw completion text into at most `count` drafts.
pub fn parse_completion(raw: &str, count: usize) -> Vec<GeneratedPost> {
    let cleaned = strip_code_fence(raw);

    match serde_json::from_str::<Value>(cleaned) {
        Ok(Value::Array(items)) => items.iter().take(count).map(normalize_item).collect(),
        Ok(other) => {
            tracing::warn!(
                kind = json_kind(&other),
                "Generator output is not an array, keeping raw text"
            );
            vec![GeneratedPost::text_only(cleaned)]
        }
        Err(e) => {
            tracing::warn!(error = %e, "Generator output is not valid JSON, keeping raw text");
            vec![GeneratedPost::text_only(cleaned)]
        }
    }
}

fn normalize_item(item: &Value) -> GeneratedPost {
    let text = item
        .get("text")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let hashtags = item
        .get("hashtags")
        .and_then(Value::as_array)
        .map(|tags| {
            tags.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let image_prompt = item
        .get("imagePrompt")
        .or_else(|| item.get("image_prompt"))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string);

    GeneratedPost {
        text,
        hashtags,
        image_prompt,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use uuid::Uuid;

    struct ScriptedGenerator {
        reply: Result<String, GenerationError>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedGenerator {
        fn replying(reply: Result<String, GenerationError>) -> Arc<Self> {
            Arc::new(Self {
                reply,
                prompts: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn complete(&self, prompt: &str) -> Result<String, GenerationError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.reply.clone()
        }
    }

    fn acme() -> BrandProfile {
        BrandProfile {
            company_name: Some("Acme".into()),
            tone: Some("cheerful".into()),
            ..BrandProfile::new(Uuid::new_v4())
        }
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```json\n[1]\n```"), "[1]");
        assert_eq!(strip_code_fence("```\n[1]\n```"), "[1]");
        assert_eq!(strip_code_fence("```json [1] ```"), "[1]");
        assert_eq!(strip_code_fence("  [1]  "), "[1]");
        assert_eq!(strip_code_fence("```JSON{\"a\":1}```"), "{\"a\":1}");
    }

    #[test]
    fn test_single_line_fenced_prose_keeps_first_word() {
        let drafts = parse_completion("```Great launch day for Acme```", 3);

        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].text, "Great launch day for Acme");
        assert_eq!(strip_code_fence("```jsonify everything```"), "jsonify everything");
    }

    #[test]
    fn test_prompt_only_mentions_present_fields() {
        let prompt = build_prompt(&acme(), 3);
        assert!(prompt.contains("- Company: Acme"));
        assert!(prompt.contains("- Tone of voice: cheerful"));
        assert!(!prompt.contains("Target audience"));
        assert!(prompt.contains("exactly 3 social media posts"));
        assert!(prompt.contains("\"imagePrompt\""));
    }

    #[test]
    fn test_parse_normalizes_items() {
        let raw = r##"[
            {"text": "Hello", "hashtags": ["#a", 3, "#b"], "imagePrompt": "sunrise"},
            {"hashtags": "#not-a-list", "imagePrompt": "  "},
            {"text": "Third"}
        ]"##;

        let drafts = parse_completion(raw, 5);

        assert_eq!(drafts.len(), 3);
        assert_eq!(drafts[0].text, "Hello");
        assert_eq!(drafts[0].hashtags, vec!["#a", "#b"]);
        assert_eq!(drafts[0].image_prompt.as_deref(), Some("sunrise"));
        assert_eq!(drafts[1].text, "");
        assert!(drafts[1].hashtags.is_empty());
        assert_eq!(drafts[1].image_prompt, None);
        assert_eq!(drafts[2].text, "Third");
    }

    #[test]
    fn test_parse_truncates_to_requested_count() {
        let raw = r#"[{"text":"1"},{"text":"2"},{"text":"3"}]"#;
        assert_eq!(parse_completion(raw, 2).len(), 2);
    }

    #[test]
    fn test_fenced_malformed_json_degrades_to_single_item() {
        let raw = "```json\n[{\"text\": \"oops\", \n```";

        let drafts = parse_completion(raw, 3);

        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].text, "[{\"text\": \"oops\",");
        assert!(drafts[0].hashtags.is_empty());
        assert_eq!(drafts[0].image_prompt, None);
    }

    #[test]
    fn test_non_array_json_degrades() {
        let drafts = parse_completion(r#"{"text": "single"}"#, 3);
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].text, r#"{"text": "single"}"#);
    }

    #[tokio::test]
    async fn test_generate_sends_prompt_and_parses() {
        let capability = ScriptedGenerator::replying(Ok(
            r#"[{"text":"a","hashtags":[]},{"text":"b","hashtags":[]}]"#.to_string(),
        ));
        let generator = ContentGenerator::new(capability.clone());

        let drafts = generator.generate(&acme(), 2).await.unwrap();

        assert_eq!(drafts.len(), 2);
        let prompts = capability.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Acme"));
    }

    #[tokio::test]
    async fn test_generate_propagates_upstream_error() {
        let capability = ScriptedGenerator::replying(Err(GenerationError::Upstream {
            status: Some(500),
            message: "boom".into(),
        }));
        let generator = ContentGenerator::new(capability);

        let err = generator.generate(&acme(), 2).await.unwrap_err();

        assert!(matches!(err, GenerationError::Upstream { status: Some(500), .. }));
    }
}
