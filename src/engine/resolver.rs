use serde::{Deserialize, Serialize};

use crate::engine::expansion::{self, DEFAULT_MIN_CLIP_DURATION_SECS};
use crate::engine::matching::{self, DEFAULT_SIMILARITY_THRESHOLD};
use crate::error::ResolveError;
use crate::transcript::{self, Highlight, Segment};

/// Tunables for one resolution pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolveOptions {
    pub similarity_threshold: f64,
    pub min_clip_duration_secs: f64,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            min_clip_duration_secs: DEFAULT_MIN_CLIP_DURATION_SECS,
        }
    }
}

/// Output of a resolution pass: highlights in input-quote order, plus the
/// quotes that could not be grounded in the transcript.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub highlights: Vec<Highlight>,
    pub unmatched: Vec<String>,
}

impl Resolution {
    pub fn total_quotes(&self) -> usize {
        self.highlights.len() + self.unmatched.len()
    }

    /// Human-readable match count, e.g. "3 of 5 quotes matched".
    pub fn summary(&self) -> String {
        format!(
            "{} of {} quotes matched",
            self.highlights.len(),
            self.total_quotes()
        )
    }
}

/// Resolve every quote against `segments` independently: match it to its most
/// similar segment, then widen the window to the minimum clip duration.
///
/// Quotes below the similarity threshold are dropped from the highlights and
/// reported in [`Resolution::unmatched`]. The segment list is validated up
/// front; an invalid list rejects the whole batch.
pub fn resolve_highlights<S: AsRef<str>>(
    segments: &[Segment],
    quotes: &[S],
    options: &ResolveOptions,
) -> Result<Resolution, ResolveError> {
    transcript::validate_segments(segments)?;

    let total_duration = transcript::total_duration(segments);
    if total_duration < options.min_clip_duration_secs {
        tracing::info!(
            "Transcript is {:.1}s long, shorter than the {:.1}s minimum; clips will be capped at the transcript length",
            total_duration,
            options.min_clip_duration_secs
        );
    }

    let mut resolution = Resolution::default();

    for quote in quotes {
        let quote = quote.as_ref().trim();
        if quote.is_empty() {
            tracing::debug!("Skipping empty quote");
            resolution.unmatched.push(quote.to_string());
            continue;
        }

        let Some(found) = matching::best_match(quote, segments, options.similarity_threshold)
        else {
            let best_ratio = matching::best_candidate(quote, segments)
                .map(|m| m.ratio)
                .unwrap_or(0.0);
            tracing::debug!(
                "No segment matched {:?} (best ratio {:.2} < {:.2})",
                quote,
                best_ratio,
                options.similarity_threshold
            );
            resolution.unmatched.push(quote.to_string());
            continue;
        };

        let Some(window) =
            expansion::expand_window(segments, found.index, options.min_clip_duration_secs)
        else {
            tracing::warn!(
                "Matched segment {} is outside the transcript; dropping {:?}",
                found.index,
                quote
            );
            resolution.unmatched.push(quote.to_string());
            continue;
        };

        let highlight = Highlight {
            quote: quote.to_string(),
            start: window.start_time(segments),
            end: window.end_time(segments),
            matched_text: window.text(segments),
        };

        tracing::debug!(
            "Quote {:?} matched segment {} (ratio {:.2}), window [{}, {}] = {:.1}s-{:.1}s",
            quote,
            found.index,
            found.ratio,
            window.start_idx,
            window.end_idx,
            highlight.start,
            highlight.end
        );

        resolution.highlights.push(highlight);
    }

    tracing::info!("{}", resolution.summary());
    Ok(resolution)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn story_segments() -> Vec<Segment> {
        vec![
            Segment::new("t", 0.0, 10.0),
            Segment::new("great story", 10.0, 25.0),
            Segment::new("ending", 25.0, 40.0),
        ]
    }

    fn options(min: f64) -> ResolveOptions {
        ResolveOptions {
            min_clip_duration_secs: min,
            ..Default::default()
        }
    }

    #[test]
    fn test_default_options() {
        let options = ResolveOptions::default();
        assert_eq!(options.similarity_threshold, 0.6);
        assert_eq!(options.min_clip_duration_secs, 60.0);
    }

    #[test]
    fn test_expands_to_full_story() {
        let resolution =
            resolve_highlights(&story_segments(), &["great story"], &options(30.0)).unwrap();
        assert_eq!(
            resolution.highlights,
            vec![Highlight {
                quote: "great story".to_string(),
                start: 0.0,
                end: 40.0,
                matched_text: "t great story ending".to_string(),
            }]
        );
        assert!(resolution.unmatched.is_empty());
    }

    #[test]
    fn test_unmatched_quote_is_dropped() {
        let quotes = ["great story", "zzzz qqqq xxxx"];
        let resolution = resolve_highlights(&story_segments(), &quotes, &options(30.0)).unwrap();
        assert_eq!(resolution.highlights.len(), 1);
        assert_eq!(resolution.unmatched, vec!["zzzz qqqq xxxx".to_string()]);
        assert_eq!(resolution.summary(), "1 of 2 quotes matched");
    }

    #[test]
    fn test_single_long_segment_is_not_expanded() {
        let segments = vec![Segment::new("hello", 0.0, 90.0)];
        let resolution = resolve_highlights(&segments, &["hello"], &options(60.0)).unwrap();
        assert_eq!(resolution.highlights.len(), 1);
        assert_eq!(resolution.highlights[0].start, 0.0);
        assert_eq!(resolution.highlights[0].end, 90.0);
        assert_eq!(resolution.highlights[0].matched_text, "hello");
    }

    #[test]
    fn test_preserves_quote_order_and_allows_duplicates() {
        let quotes = vec!["ending".to_string(), "nothing alike!!".to_string(), "ending".to_string()];
        let resolution = resolve_highlights(&story_segments(), &quotes, &options(0.0)).unwrap();
        assert_eq!(resolution.highlights.len(), 2);
        assert_eq!(resolution.highlights[0], resolution.highlights[1]);
        assert_eq!(resolution.highlights[0].start, 25.0);
    }

    #[test]
    fn test_short_transcript_returns_shorter_clip() {
        let resolution =
            resolve_highlights(&story_segments(), &["ending", "t"], &options(300.0)).unwrap();
        assert_eq!(resolution.highlights.len(), 2);
        for highlight in &resolution.highlights {
            assert_eq!((highlight.start, highlight.end), (0.0, 40.0));
            assert!(highlight.duration() < 300.0);
        }
        assert!(resolution.unmatched.is_empty());
    }

    #[test]
    fn test_empty_quote_counts_as_unmatched() {
        let resolution = resolve_highlights(&story_segments(), &["   "], &options(30.0)).unwrap();
        assert!(resolution.highlights.is_empty());
        assert_eq!(resolution.total_quotes(), 1);
    }

    #[test]
    fn test_empty_quote_list() {
        let quotes: [&str; 0] = [];
        let resolution = resolve_highlights(&story_segments(), &quotes, &options(30.0)).unwrap();
        assert_eq!(resolution, Resolution::default());
    }

    #[test]
    fn test_invalid_segments_reject_batch() {
        let segments = vec![Segment::new("a", 5.0, 2.0)];
        let result = resolve_highlights(&segments, &["a"], &options(30.0));
        assert!(matches!(result, Err(ResolveError::InvalidSegment { index: 0, .. })));

        let empty: Vec<Segment> = Vec::new();
        let result = resolve_highlights(&empty, &["a"], &options(30.0));
        assert_eq!(result, Err(ResolveError::EmptyTranscript));
    }

    #[test]
    fn test_threshold_one_requires_exact_text() {
        let strict = ResolveOptions {
            similarity_threshold: 1.0,
            min_clip_duration_secs: 0.0,
        };
        let resolution =
            resolve_highlights(&story_segments(), &["great story", "great stories"], &strict)
                .unwrap();
        assert_eq!(resolution.highlights.len(), 1);
        assert_eq!(resolution.unmatched, vec!["great stories".to_string()]);
    }

    #[test]
    fn test_idempotent() {
        let quotes = ["great story", "ending", "unrelated words here"];
        let first = resolve_highlights(&story_segments(), &quotes, &options(20.0)).unwrap();
        let second = resolve_highlights(&story_segments(), &quotes, &options(20.0)).unwrap();
        assert_eq!(first, second);
    }
}
