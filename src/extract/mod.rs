pub mod hashtags;
pub mod llm;
pub mod quotes;

use anyhow::Result;

pub use quotes::ExtractedQuote;

/// Source of candidate highlight quotes for a transcript. Quotes are not
/// guaranteed to be verbatim excerpts.
pub trait QuoteExtractor {
    fn name(&self) -> &str;
    fn extract_quotes(&self, transcript_text: &str, count: usize) -> Result<Vec<ExtractedQuote>>;
}
