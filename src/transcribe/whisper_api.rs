use std::path::Path;

use anyhow::{Context, Result};
use reqwest::blocking::multipart;

use crate::config::TranscriptionConfig;
use crate::transcribe::backend::TranscriptionBackend;
use crate::transcript::Transcript;

/// Whisper-compatible `/audio/transcriptions` endpoint (OpenAI, LemonFox, ...).
pub struct WhisperApiBackend {
    endpoint: String,
    api_key: String,
    model: String,
    language: String,
    timeout_secs: u64,
}

impl std::fmt::Debug for WhisperApiBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhisperApiBackend")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("language", &self.language)
            .finish()
    }
}

impl WhisperApiBackend {
    pub fn new(config: &TranscriptionConfig) -> Result<Self> {
        if config.endpoint.trim().is_empty() {
            anyhow::bail!(
                "Transcription endpoint not configured. Set [transcription] endpoint in clipforge.toml"
            );
        }

        let api_key = if config.api_key.is_empty() {
            std::env::var("CLIPFORGE_TRANSCRIPTION_KEY")
                .map_err(|_| anyhow::anyhow!("Transcription API key not configured"))?
        } else {
            config.api_key.clone()
        };

        Ok(Self {
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
            language: config.language.clone(),
            timeout_secs: config.timeout_secs,
        })
    }

    fn url(&self) -> String {
        format!("{}/audio/transcriptions", self.endpoint)
    }
}

impl TranscriptionBackend for WhisperApiBackend {
    fn name(&self) -> &str {
        "whisper-api"
    }

    fn transcribe(&self, audio_path: &Path) -> Result<Transcript> {
        let file_bytes = std::fs::read(audio_path)
            .with_context(|| format!("Failed to read audio {}", audio_path.display()))?;
        let filename = audio_path
            .file_name()
            .ok_or_else(|| anyhow::anyhow!("audio path has no filename: {}", audio_path.display()))?
            .to_string_lossy()
            .to_string();

        let mut form = multipart::Form::new()
            .part(
                "file",
                multipart::Part::bytes(file_bytes)
                    .file_name(filename)
                    .mime_str(mime_for(audio_path))?,
            )
            .text("model", self.model.clone())
            .text("response_format", "verbose_json");
        if !self.language.is_empty() {
            form = form.text("language", self.language.clone());
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(self.timeout_secs))
            .build()?;
        let response = client
            .post(self.url())
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .context("Failed to send transcription request")?;

        let response = response.error_for_status()?;
        let body = response.text()?;
        let transcript =
            Transcript::parse(&body).context("Transcription response had no segments")?;

        tracing::info!(
            "Transcribed {} ({} segments, {:.1}s)",
            audio_path.display(),
            transcript.segments.len(),
            transcript.duration()
        );
        Ok(transcript)
    }
}

fn mime_for(path: &Path) -> &'static str {
    match path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .as_deref()
    {
        Some("wav") => "audio/wav",
        Some("m4a") => "audio/mp4",
        Some("ogg") => "audio/ogg",
        Some("flac") => "audio/flac",
        _ => "audio/mpeg",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> TranscriptionConfig {
        TranscriptionConfig {
            api_key: "test-key".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_new_builds_url() {
        let backend = WhisperApiBackend::new(&TranscriptionConfig {
            endpoint: "https://api.example.com/v1/".to_string(),
            ..config()
        })
        .unwrap();
        assert_eq!(backend.url(), "https://api.example.com/v1/audio/transcriptions");
        assert_eq!(backend.name(), "whisper-api");
    }

    #[test]
    fn test_new_missing_endpoint() {
        let result = WhisperApiBackend::new(&TranscriptionConfig {
            endpoint: " ".to_string(),
            ..config()
        });
        assert!(result.unwrap_err().to_string().contains("endpoint"));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let backend = WhisperApiBackend::new(&config()).unwrap();
        let debug_output = format!("{:?}", backend);
        assert!(!debug_output.contains("test-key"));
        assert!(debug_output.contains("[REDACTED]"));
    }

    #[test]
    fn test_mime_for() {
        assert_eq!(mime_for(Path::new("a.mp3")), "audio/mpeg");
        assert_eq!(mime_for(Path::new("a.WAV")), "audio/wav");
        assert_eq!(mime_for(Path::new("noext")), "audio/mpeg");
    }

    #[test]
    fn test_transcribe_missing_file_errors() {
        let backend = WhisperApiBackend::new(&config()).unwrap();
        assert!(backend.transcribe(Path::new("/nonexistent/audio.mp3")).is_err());
    }
}
