pub mod cli;
pub mod commands;
pub mod config;
pub mod engine;
pub mod error;
pub mod extract;
pub mod ffmpeg;
pub mod transcribe;
pub mod transcript;

pub use engine::{resolve_highlights, Resolution, ResolveOptions};
pub use error::ResolveError;
pub use transcript::{Highlight, ScoredSegment, Segment, Transcript};
