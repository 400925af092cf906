use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::extract::llm::LlmClient;
use crate::extract::QuoteExtractor;

/// Transcript text beyond this many characters is not sent to the model.
const MAX_PROMPT_CHARS: usize = 12_000;

/// A nominated highlight: why it is interesting, and the excerpt itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedQuote {
    #[serde(default)]
    pub description: String,
    pub quote: String,
}

/// Build the prompt asking for `count` verbatim excerpts.
pub fn build_prompt(transcript_text: &str, count: usize) -> String {
    format!(
        "You are an editor picking moments for short-form vertical video clips.\n\
         From the transcript below, select the {count} most engaging moments: strong \
         opinions, surprising facts, emotional peaks, or punchlines.\n\n\
         For each moment, copy the exact sentence from the transcript. Do not \
         paraphrase, shorten, or fix grammar.\n\n\
         Respond with ONLY a JSON array, no markdown, in this format:\n\
         [{{\"description\": \"why this moment works\", \"quote\": \"exact transcript sentence\"}}]\n\n\
         Transcript:\n```\n{text}\n```",
        count = count,
        text = truncate_chars(transcript_text, MAX_PROMPT_CHARS),
    )
}

/// One element of a JSON reply: either a full object or a bare quote string.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawQuote {
    Pair(ExtractedQuote),
    Bare(String),
}

impl From<RawQuote> for ExtractedQuote {
    fn from(raw: RawQuote) -> Self {
        match raw {
            RawQuote::Pair(q) => ExtractedQuote {
                description: q.description.trim().to_string(),
                quote: q.quote.trim().to_string(),
            },
            RawQuote::Bare(quote) => ExtractedQuote {
                description: String::new(),
                quote: quote.trim().to_string(),
            },
        }
    }
}

/// Parse model output into quotes. Accepts a JSON array of
/// `{description, quote}` objects or of plain strings (optionally surrounded
/// by prose), and falls back to reading one quoted excerpt per line.
pub fn parse_quotes(response: &str) -> Vec<ExtractedQuote> {
    if let Some(quotes) = parse_json_quotes(response) {
        return quotes;
    }

    response.lines().filter_map(parse_quote_line).collect()
}

fn parse_json_quotes(response: &str) -> Option<Vec<ExtractedQuote>> {
    let start = response.find('[')?;
    let end = response.rfind(']')?;
    if end <= start {
        return None;
    }

    let parsed: Vec<RawQuote> = serde_json::from_str(&response[start..=end]).ok()?;
    Some(
        parsed
            .into_iter()
            .map(ExtractedQuote::from)
            .filter(|q| !q.quote.is_empty())
            .collect(),
    )
}

/// `1. Bold claim: "We never gave up."` -> description + quote. Only the
/// first quoted span on the line is taken.
fn parse_quote_line(line: &str) -> Option<ExtractedQuote> {
    let (open, close_char) = line.char_indices().find_map(|(i, c)| match c {
        '"' => Some((i, '"')),
        '\u{201C}' => Some((i, '\u{201D}')),
        _ => None,
    })?;

    let after_open = open + line[open..].chars().next()?.len_utf8();
    let close = after_open + line[after_open..].find(close_char)?;
    let quote = line[after_open..close].trim();
    if quote.is_empty() {
        return None;
    }

    let description = strip_list_marker(&line[..open])
        .trim_end_matches(|c: char| c == ':' || c == '-' || c.is_whitespace())
        .to_string();

    Some(ExtractedQuote {
        description,
        quote: quote.to_string(),
    })
}

fn strip_list_marker(text: &str) -> &str {
    let text = text.trim_start();
    let text = text.trim_start_matches(|c: char| c.is_ascii_digit());
    text.trim_start_matches(['.', ')', '-', '*', '•'])
        .trim_start()
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Load quotes from a file: a JSON array of strings, or one quote per line.
pub fn load_quotes(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read quotes {}", path.display()))?;

    if content.trim_start().starts_with('[') {
        let quotes: Vec<String> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse quotes {}", path.display()))?;
        return Ok(quotes);
    }

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect())
}

/// Quote extraction backed by a chat completion model.
#[derive(Debug)]
pub struct LlmQuoteExtractor {
    client: LlmClient,
}

impl LlmQuoteExtractor {
    pub fn new(client: LlmClient) -> Self {
        Self { client }
    }
}

impl QuoteExtractor for LlmQuoteExtractor {
    fn name(&self) -> &str {
        "llm"
    }

    fn extract_quotes(&self, transcript_text: &str, count: usize) -> Result<Vec<ExtractedQuote>> {
        let prompt = build_prompt(transcript_text, count);
        let response = self
            .client
            .complete(&prompt)
            .context("Quote extraction request failed")?;

        let quotes = parse_quotes(&response);
        if quotes.is_empty() {
            tracing::warn!("Model response contained no quotes");
        } else {
            tracing::info!("Model returned {} quotes ({} requested)", quotes.len(), count);
        }
        Ok(quotes)
    }
}
