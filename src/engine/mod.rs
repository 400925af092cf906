//! Highlight resolution: ground approximate quotes in a transcript and widen
//! them into clip-length, segment-aligned intervals.
//!
//! Everything in here is pure computation over caller-owned slices. No I/O,
//! no shared state, so independent passes can run on separate threads.

pub mod expansion;
pub mod matching;
pub mod resolver;
pub mod scorer;
pub mod similarity;

pub use expansion::{expand_window, Window};
pub use matching::{best_match, SegmentMatch};
pub use resolver::{resolve_highlights, Resolution, ResolveOptions};
pub use scorer::{select_highlights, top_segments, LexiconScorer, SentimentScorer};
