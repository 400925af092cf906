use crate::engine::similarity;
use crate::transcript::Segment;

/// Default minimum similarity for a quote to be accepted as a match.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.6;

/// The segment a quote resolved to, by position in the transcript.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentMatch {
    pub index: usize,
    pub ratio: f64,
}

/// Most similar segment regardless of threshold. Ties keep the earliest
/// segment. `None` only for an empty list.
pub fn best_candidate(quote: &str, segments: &[Segment]) -> Option<SegmentMatch> {
    let mut best: Option<SegmentMatch> = None;

    for (index, segment) in segments.iter().enumerate() {
        let ratio = similarity::ratio(quote, &segment.text);
        match best {
            Some(current) if ratio <= current.ratio => {}
            _ => best = Some(SegmentMatch { index, ratio }),
        }
    }

    best
}

/// Best-matching segment for `quote`, accepted only when its ratio reaches
/// `threshold`.
pub fn best_match(quote: &str, segments: &[Segment], threshold: f64) -> Option<SegmentMatch> {
    best_candidate(quote, segments).filter(|m| m.ratio >= threshold)
}
