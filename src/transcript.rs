use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::ResolveError;

/// A single time-stamped chunk of transcribed speech.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub text: String,
    pub start: f64,
    pub end: f64,
}

impl Segment {
    pub fn new(text: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            text: text.into(),
            start,
            end,
        }
    }
}

/// A resolved, segment-aligned clip interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Highlight {
    pub quote: String,
    pub start: f64,
    pub end: f64,
    pub matched_text: String,
}

impl Highlight {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// A segment together with its interestingness score (higher is better).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredSegment {
    pub start: f64,
    pub end: f64,
    pub text: String,
    pub score: f64,
}

impl From<ScoredSegment> for Highlight {
    fn from(scored: ScoredSegment) -> Self {
        let text = scored.text.trim().to_string();
        Self {
            quote: text.clone(),
            start: scored.start,
            end: scored.end,
            matched_text: text,
        }
    }
}

/// Full transcript as produced by a transcription backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transcript {
    #[serde(default)]
    pub text: String,
    pub segments: Vec<Segment>,
}

impl Transcript {
    pub fn from_segments(segments: Vec<Segment>) -> Self {
        let text = join_text(&segments);
        Self { text, segments }
    }

    /// Load a transcript from JSON: either a bare segment array or an object
    /// with a `segments` field (Whisper verbose JSON).
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read transcript {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse transcript {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum TranscriptFile {
            Segments(Vec<Segment>),
            Document(Transcript),
        }

        let transcript = match serde_json::from_str::<TranscriptFile>(content)? {
            TranscriptFile::Segments(segments) => Self::from_segments(segments),
            TranscriptFile::Document(mut doc) => {
                if doc.text.trim().is_empty() {
                    doc.text = join_text(&doc.segments);
                }
                doc
            }
        };
        Ok(transcript)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write transcript {}", path.display()))?;
        Ok(())
    }

    pub fn duration(&self) -> f64 {
        total_duration(&self.segments)
    }
}

/// Join segment texts with single spaces, trimming each piece.
pub fn join_text(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(|s| s.text.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Span from the first segment's start to the last segment's end.
pub fn total_duration(segments: &[Segment]) -> f64 {
    match (segments.first(), segments.last()) {
        (Some(first), Some(last)) => last.end - first.start,
        _ => 0.0,
    }
}

/// Check that the list is non-empty, every segment has `start < end`, and
/// starts never decrease.
pub fn validate_segments(segments: &[Segment]) -> Result<(), ResolveError> {
    if segments.is_empty() {
        return Err(ResolveError::EmptyTranscript);
    }

    let mut previous: Option<f64> = None;
    for (index, segment) in segments.iter().enumerate() {
        let bounds_ok = segment.start.is_finite()
            && segment.end.is_finite()
            && segment.start >= 0.0
            && segment.start < segment.end;
        if !bounds_ok {
            return Err(ResolveError::InvalidSegment {
                index,
                start: segment.start,
                end: segment.end,
            });
        }

        if let Some(prev) = previous {
            if segment.start < prev {
                return Err(ResolveError::OutOfOrder {
                    index,
                    start: segment.start,
                    previous: prev,
                });
            }
        }
        previous = Some(segment.start);
    }

    Ok(())
}
