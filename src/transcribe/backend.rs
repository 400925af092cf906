use std::path::Path;

use anyhow::Result;

use crate::transcript::Transcript;

/// Produces a time-aligned transcript for an audio file.
pub trait TranscriptionBackend: Send {
    fn name(&self) -> &str;
    fn transcribe(&self, audio_path: &Path) -> Result<Transcript>;
}
