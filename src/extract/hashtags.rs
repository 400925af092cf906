use std::sync::OnceLock;

use regex::Regex;

use crate::extract::llm::LlmClient;

/// Used whenever generation or parsing fails.
pub const DEFAULT_HASHTAGS: &[&str] = &["video", "content", "trending", "viral", "fyp"];

/// Transcript text beyond this many characters is not sent to the model.
const MAX_PROMPT_CHARS: usize = 4_000;

pub fn default_hashtags() -> Vec<String> {
    DEFAULT_HASHTAGS.iter().map(|t| t.to_string()).collect()
}

pub fn build_prompt(transcript_text: &str, count: usize) -> String {
    let text: String = transcript_text.chars().take(MAX_PROMPT_CHARS).collect();
    format!(
        "Based on the following transcript from a video, generate {count} relevant hashtags.\n\
         These hashtags should be:\n\
         1. Relevant to the content and themes discussed\n\
         2. Popular or trending on social media platforms\n\
         3. A mix of specific and general tags\n\
         4. Without the # symbol\n\
         5. Short, catchy, and all lowercase\n\n\
         Format the output as a JSON array of strings.\n\n\
         Transcript:\n```\n{text}\n```",
    )
}

fn quoted_tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r#"["'](#?\w+)["']"#).expect("static regex is valid"))
}

/// Parse a model response into at most `count` unique, lowercase hashtags
/// without the leading `#`. Returns an empty list if nothing usable is found.
pub fn parse_hashtags(response: &str, count: usize) -> Vec<String> {
    if count == 0 {
        return Vec::new();
    }

    let raw: Vec<String> = match serde_json::from_str::<Vec<String>>(response.trim()) {
        Ok(tags) => tags,
        Err(_) => quoted_tag_pattern()
            .captures_iter(response)
            .map(|caps| caps[1].to_string())
            .collect(),
    };

    let mut tags: Vec<String> = Vec::new();
    for tag in raw {
        let tag = tag.trim().trim_start_matches('#').to_lowercase();
        if tag.is_empty() || tags.contains(&tag) {
            continue;
        }
        tags.push(tag);
        if tags.len() == count {
            break;
        }
    }
    tags
}

/// Generate hashtags for a transcript, falling back to [`DEFAULT_HASHTAGS`]
/// on any failure.
pub fn generate_hashtags(client: &LlmClient, transcript_text: &str, count: usize) -> Vec<String> {
    if transcript_text.trim().is_empty() {
        return default_hashtags();
    }

    let response = match client.complete(&build_prompt(transcript_text, count)) {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!("Hashtag generation failed, using defaults: {:#}", e);
            return default_hashtags();
        }
    };

    let tags = parse_hashtags(&response, count);
    if tags.is_empty() {
        tracing::warn!("No hashtags found in model response, using defaults");
        return default_hashtags();
    }
    tags
}
