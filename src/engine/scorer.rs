use std::collections::HashMap;

use crate::error::ResolveError;
use crate::transcript::{self, Highlight, ScoredSegment, Segment};

/// Black-box sentiment function. Implementations must be deterministic and
/// side-effect free for a given input.
pub trait SentimentScorer {
    /// Polarity of `text`, nominally in `[-1.0, 1.0]`.
    fn polarity(&self, text: &str) -> f64;
}

impl<F> SentimentScorer for F
where
    F: Fn(&str) -> f64,
{
    fn polarity(&self, text: &str) -> f64 {
        self(text)
    }
}

/// Words that flip the polarity of the next sentiment-bearing word.
const NEGATIONS: &[&str] = &[
    "not", "no", "never", "don't", "doesn't", "didn't", "isn't", "wasn't", "can't", "won't",
];

/// Built-in lexicon: word -> polarity.
const LEXICON: &[(&str, f64)] = &[
    ("amazing", 0.6),
    ("awesome", 1.0),
    ("beautiful", 0.85),
    ("best", 1.0),
    ("brilliant", 0.9),
    ("excellent", 1.0),
    ("exciting", 0.3),
    ("fantastic", 0.4),
    ("glad", 0.5),
    ("good", 0.7),
    ("great", 0.8),
    ("happy", 0.8),
    ("incredible", 0.9),
    ("love", 0.5),
    ("loved", 0.7),
    ("perfect", 1.0),
    ("proud", 0.8),
    ("win", 0.8),
    ("wonderful", 1.0),
    ("angry", -0.5),
    ("awful", -1.0),
    ("bad", -0.7),
    ("boring", -1.0),
    ("disaster", -0.8),
    ("disgusting", -1.0),
    ("failed", -0.5),
    ("hate", -0.8),
    ("horrible", -1.0),
    ("lost", -0.4),
    ("sad", -0.5),
    ("scared", -0.6),
    ("stupid", -0.8),
    ("terrible", -1.0),
    ("ugly", -0.7),
    ("worst", -1.0),
    ("wrong", -0.5),
];

/// Multipliers applied by intensifiers to the next sentiment-bearing word.
const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.3),
    ("really", 1.3),
    ("so", 1.3),
    ("extremely", 1.5),
    ("incredibly", 1.5),
    ("absolutely", 1.5),
    ("slightly", 0.5),
];

/// Lexicon-based polarity: the mean polarity of the sentiment-bearing words
/// in the text, with negation (`* -0.5`) and intensifier modifiers applied to
/// the word that follows them. Text with no sentiment words scores 0.0.
#[derive(Debug, Clone)]
pub struct LexiconScorer {
    lexicon: HashMap<String, f64>,
    intensifiers: HashMap<String, f64>,
}

impl LexiconScorer {
    pub fn new() -> Self {
        Self {
            lexicon: LEXICON.iter().map(|(w, p)| (w.to_string(), *p)).collect(),
            intensifiers: INTENSIFIERS
                .iter()
                .map(|(w, m)| (w.to_string(), *m))
                .collect(),
        }
    }

    /// Add or override a lexicon entry.
    pub fn with_word(mut self, word: &str, polarity: f64) -> Self {
        self.lexicon.insert(word.to_lowercase(), polarity);
        self
    }
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentScorer for LexiconScorer {
    fn polarity(&self, text: &str) -> f64 {
        let mut scores = Vec::new();
        let mut negate = false;
        let mut multiplier: f64 = 1.0;

        for raw in text.split_whitespace() {
            let word = raw
                .trim_matches(|c: char| !c.is_alphanumeric() && c != '\'')
                .to_lowercase();
            if word.is_empty() {
                continue;
            }

            if NEGATIONS.contains(&word.as_str()) {
                negate = true;
                continue;
            }
            if let Some(m) = self.intensifiers.get(&word) {
                multiplier *= m;
                continue;
            }

            if let Some(&polarity) = self.lexicon.get(&word) {
                let mut score = polarity * multiplier;
                if negate {
                    score *= -0.5;
                }
                scores.push(score.clamp(-1.0, 1.0));
                negate = false;
                multiplier = 1.0;
            }
        }

        if scores.is_empty() {
            0.0
        } else {
            scores.iter().sum::<f64>() / scores.len() as f64
        }
    }
}

/// Score every segment by absolute polarity and keep the `top_n` strongest.
/// Ties keep transcript order; non-finite scores count as 0. An invalid
/// segment list is rejected before anything is scored.
pub fn top_segments<S>(
    segments: &[Segment],
    scorer: &S,
    top_n: usize,
) -> Result<Vec<ScoredSegment>, ResolveError>
where
    S: SentimentScorer + ?Sized,
{
    transcript::validate_segments(segments)?;

    let mut scored: Vec<ScoredSegment> = segments
        .iter()
        .map(|segment| {
            let score = scorer.polarity(&segment.text).abs();
            ScoredSegment {
                start: segment.start,
                end: segment.end,
                text: segment.text.clone(),
                score: if score.is_finite() { score } else { 0.0 },
            }
        })
        .collect();

    // Stable sort, so equal scores stay in transcript order
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(top_n);
    Ok(scored)
}

/// Top-N segments as single-segment highlights (no window expansion).
pub fn select_highlights<S>(
    segments: &[Segment],
    scorer: &S,
    top_n: usize,
) -> Result<Vec<Highlight>, ResolveError>
where
    S: SentimentScorer + ?Sized,
{
    let selected: Vec<Highlight> = top_segments(segments, scorer, top_n)?
        .into_iter()
        .map(Highlight::from)
        .collect();

    tracing::info!(
        "Selected {} of {} segments by sentiment",
        selected.len(),
        segments.len()
    );
    Ok(selected)
}
