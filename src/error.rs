use thiserror::Error;

/// Caller contract violations detected before any matching takes place.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolveError {
    #[error("Transcript has no segments")]
    EmptyTranscript,

    #[error("Segment {index} has invalid bounds: start={start}, end={end}")]
    InvalidSegment { index: usize, start: f64, end: f64 },

    #[error("Segment {index} starts at {start} before the previous segment ({previous})")]
    OutOfOrder {
        index: usize,
        start: f64,
        previous: f64,
    },
}
