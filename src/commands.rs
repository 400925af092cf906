use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cli::ResolveArgs;
use crate::config::Config;
use crate::engine::{self, LexiconScorer};
use crate::extract::hashtags;
use crate::extract::llm::LlmClient;
use crate::extract::quotes::{self, LlmQuoteExtractor};
use crate::extract::QuoteExtractor;
use crate::ffmpeg::ClipCutter;
use crate::transcribe::{TranscriptionBackend, WhisperApiBackend};
use crate::transcript::{self, Highlight, Transcript};

/// How the highlights in a manifest were selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMethod {
    Quotes,
    Sentiment,
}

/// Output of `resolve` and `score`, handed to the clip cutter or the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighlightManifest {
    pub generated_at: DateTime<Utc>,
    pub transcript: PathBuf,
    pub method: SelectionMethod,
    /// Quotes (or segments) asked for.
    pub requested: usize,
    pub matched: usize,
    pub highlights: Vec<Highlight>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unmatched: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub clips: Vec<PathBuf>,
}

impl HighlightManifest {
    fn new(transcript: &Path, method: SelectionMethod, requested: usize) -> Self {
        Self {
            generated_at: Utc::now(),
            transcript: transcript.to_path_buf(),
            method,
            requested,
            matched: 0,
            highlights: Vec::new(),
            unmatched: Vec::new(),
            clips: Vec::new(),
        }
    }

    fn with_highlights(mut self, highlights: Vec<Highlight>) -> Self {
        self.matched = highlights.len();
        self.highlights = highlights;
        self
    }

    /// Write pretty JSON to `output`, or print it to stdout.
    pub fn emit(&self, output: Option<&Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        match output {
            Some(path) => {
                std::fs::write(path, json)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                tracing::info!("Highlight manifest saved to {}", path.display());
            }
            None => println!("{}", json),
        }
        Ok(())
    }
}

/// Apply CLI overrides to the resolution settings and re-validate.
fn resolution_config(config: &Config, args: &ResolveArgs) -> Result<Config> {
    let mut config = config.clone();
    if let Some(min) = args.min_duration {
        config.resolution.min_clip_duration_secs = min;
    }
    if let Some(threshold) = args.threshold {
        config.resolution.similarity_threshold = threshold;
    }
    config.validate()?;
    Ok(config)
}

fn load_or_extract_quotes(
    config: &Config,
    args: &ResolveArgs,
    transcript: &Transcript,
) -> Result<Vec<String>> {
    if let Some(path) = &args.quotes {
        return quotes::load_quotes(path);
    }

    let extractor = LlmQuoteExtractor::new(
        LlmClient::from_config(&config.llm).context("Failed to initialize LLM client")?,
    );
    let extracted = extractor.extract_quotes(&transcript.text, config.resolution.quote_count)?;
    Ok(extracted.into_iter().map(|q| q.quote).collect())
}

fn cut_clips(config: &Config, video: &Path, highlights: &[Highlight]) -> Vec<PathBuf> {
    let cutter = ClipCutter::new(&config.clips);
    let clips = cutter.cut_all(video, highlights);
    tracing::info!("Cut {} of {} clips", clips.len(), highlights.len());
    clips
}

/// Entry point for `clipforge resolve`.
pub fn run_resolve(config: &Config, args: &ResolveArgs) -> Result<()> {
    let config = resolution_config(config, args)?;
    let transcript = Transcript::load(&args.transcript)?;
    transcript::validate_segments(&transcript.segments)
        .with_context(|| format!("Invalid transcript {}", args.transcript.display()))?;

    let quotes = load_or_extract_quotes(&config, args, &transcript)?;
    let requested = if args.extract {
        config.resolution.quote_count
    } else {
        quotes.len()
    };

    let resolution =
        engine::resolve_highlights(&transcript.segments, &quotes, &config.resolution.options())?;
    for quote in &resolution.unmatched {
        tracing::info!("Dropped unmatched quote: {:?}", quote);
    }

    let mut manifest =
        HighlightManifest::new(&args.transcript, SelectionMethod::Quotes, requested)
            .with_highlights(resolution.highlights);
    manifest.unmatched = resolution.unmatched;

    if let Some(video) = &args.cut {
        manifest.clips = cut_clips(&config, video, &manifest.highlights);
    }

    manifest.emit(args.output.as_deref())
}

/// Entry point for `clipforge score`.
pub fn run_score(
    config: &Config,
    transcript_path: &Path,
    top: Option<usize>,
    output: Option<&Path>,
    cut: Option<&Path>,
) -> Result<()> {
    let transcript = Transcript::load(transcript_path)?;

    let top_n = top.unwrap_or(config.scoring.top_n);
    let highlights = engine::select_highlights(&transcript.segments, &LexiconScorer::new(), top_n)
        .with_context(|| format!("Invalid transcript {}", transcript_path.display()))?;

    let mut manifest = HighlightManifest::new(transcript_path, SelectionMethod::Sentiment, top_n)
        .with_highlights(highlights);

    if let Some(video) = cut {
        manifest.clips = cut_clips(config, video, &manifest.highlights);
    }

    manifest.emit(output)
}

/// Entry point for `clipforge extract`.
pub fn run_extract(config: &Config, transcript_path: &Path, count: Option<usize>) -> Result<()> {
    let transcript = Transcript::load(transcript_path)?;
    let count = count.unwrap_or(config.resolution.quote_count);

    let extractor = LlmQuoteExtractor::new(
        LlmClient::from_config(&config.llm).context("Failed to initialize LLM client")?,
    );
    let extracted = extractor.extract_quotes(&transcript.text, count)?;

    println!("{}", serde_json::to_string_pretty(&extracted)?);
    Ok(())
}

/// Entry point for `clipforge hashtags`.
pub fn run_hashtags(config: &Config, transcript_path: &Path, count: Option<usize>) -> Result<()> {
    let transcript = Transcript::load(transcript_path)?;
    let count = count.unwrap_or(config.hashtags.count);

    let tags = match LlmClient::from_config(&config.llm) {
        Ok(client) => hashtags::generate_hashtags(&client, &transcript.text, count),
        Err(e) => {
            tracing::warn!("LLM not configured, using default hashtags: {:#}", e);
            hashtags::default_hashtags()
        }
    };

    println!("{}", tags.iter().map(|t| format!("#{}", t)).collect::<Vec<_>>().join(" "));
    Ok(())
}

/// Entry point for `clipforge transcribe`.
pub fn run_transcribe(
    config: &Config,
    audio: Option<&Path>,
    video: Option<&Path>,
    output: &Path,
) -> Result<()> {
    let audio_path = match (audio, video) {
        (Some(audio), _) => audio.to_path_buf(),
        (None, Some(video)) => {
            let cutter = ClipCutter::new(&config.clips);
            cutter.extract_audio(video, output)?
        }
        (None, None) => anyhow::bail!("Either --audio or --video is required"),
    };

    let backend = WhisperApiBackend::new(&config.transcription)?;
    tracing::info!("Transcribing {} with {}", audio_path.display(), backend.name());
    let transcript = backend.transcribe(&audio_path)?;
    transcript.save(output)?;

    println!(
        "Transcribed {} segments ({:.1}s) to {}",
        transcript.segments.len(),
        transcript.duration(),
        output.display()
    );
    Ok(())
}

/// Entry point for `clipforge init-config`.
pub fn run_init_config(path: Option<&Path>, force: bool) -> Result<PathBuf> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => Config::platform_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?,
    };

    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists: {} (use --force to overwrite)",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(&path, Config::generate_default_commented())
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("Wrote config: {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const TRANSCRIPT: &str = r#"{
        "text": "t great story ending",
        "segments": [
            {"text": "t", "start": 0.0, "end": 10.0},
            {"text": " great story", "start": 10.0, "end": 25.0},
            {"text": " what a perfect ending", "start": 25.0, "end": 40.0}
        ]
    }"#;

    fn resolve_args(dir: &Path, quotes: &str) -> ResolveArgs {
        let transcript = dir.join("transcript.json");
        std::fs::write(&transcript, TRANSCRIPT).unwrap();
        let quotes_path = dir.join("quotes.txt");
        std::fs::write(&quotes_path, quotes).unwrap();
        ResolveArgs {
            transcript,
            quotes: Some(quotes_path),
            extract: false,
            min_duration: Some(30.0),
            threshold: None,
            output: Some(dir.join("highlights.json")),
            cut: None,
        }
    }

    fn read_manifest(path: &Path) -> HighlightManifest {
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn test_run_resolve_writes_manifest() {
        let tmp = TempDir::new().unwrap();
        let args = resolve_args(tmp.path(), "great story\nsomething else entirely xyz\n");
        run_resolve(&Config::default(), &args).unwrap();

        let manifest = read_manifest(args.output.as_deref().unwrap());
        assert_eq!(manifest.method, SelectionMethod::Quotes);
        assert_eq!(manifest.requested, 2);
        assert_eq!(manifest.matched, 1);
        assert_eq!(manifest.highlights[0].start, 0.0);
        assert_eq!(manifest.highlights[0].end, 40.0);
        assert_eq!(manifest.unmatched.len(), 1);
        assert!(manifest.clips.is_empty());
    }

    #[test]
    fn test_run_resolve_rejects_bad_threshold_override() {
        let tmp = TempDir::new().unwrap();
        let mut args = resolve_args(tmp.path(), "great story\n");
        args.threshold = Some(2.0);
        assert!(run_resolve(&Config::default(), &args).is_err());
    }

    #[test]
    fn test_run_resolve_rejects_invalid_transcript() {
        let tmp = TempDir::new().unwrap();
        let args = resolve_args(tmp.path(), "great story\n");
        std::fs::write(
            &args.transcript,
            r#"[{"text": "a", "start": 9.0, "end": 3.0}]"#,
        )
        .unwrap();
        let err = run_resolve(&Config::default(), &args).unwrap_err();
        assert!(format!("{:#}", err).contains("invalid bounds"));
    }

    #[test]
    fn test_run_score_writes_manifest() {
        let tmp = TempDir::new().unwrap();
        let transcript = tmp.path().join("transcript.json");
        std::fs::write(&transcript, TRANSCRIPT).unwrap();
        let output = tmp.path().join("scored.json");

        run_score(&Config::default(), &transcript, Some(1), Some(&output), None).unwrap();

        let manifest = read_manifest(&output);
        assert_eq!(manifest.method, SelectionMethod::Sentiment);
        assert_eq!(manifest.matched, 1);
        assert_eq!(manifest.highlights[0].start, 25.0);
        assert_eq!(manifest.highlights[0].end, 40.0);
    }

    #[test]
    fn test_run_score_rejects_invalid_transcript() {
        let tmp = TempDir::new().unwrap();
        let transcript = tmp.path().join("transcript.json");
        std::fs::write(&transcript, r#"[{"text": "awful", "start": 5.0, "end": 2.0}]"#).unwrap();
        let output = tmp.path().join("scored.json");

        let err = run_score(&Config::default(), &transcript, Some(1), Some(&output), None)
            .unwrap_err();
        assert!(format!("{:#}", err).contains("invalid bounds"));
        assert!(!output.exists());
    }

    #[test]
    fn test_run_init_config_writes_and_refuses_overwrite() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("clipforge.toml");

        let written = run_init_config(Some(&path), false).unwrap();
        assert_eq!(written, path);
        assert!(Config::load(Some(&path)).is_ok());

        assert!(run_init_config(Some(&path), false).is_err());
        assert!(run_init_config(Some(&path), true).is_ok());
    }

    #[test]
    fn test_run_transcribe_requires_input() {
        let tmp = TempDir::new().unwrap();
        let result = run_transcribe(&Config::default(), None, None, &tmp.path().join("t.json"));
        assert!(result.is_err());
    }
}
