use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::engine::ResolveOptions;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub resolution: ResolutionConfig,
    pub scoring: ScoringConfig,
    pub llm: LlmConfig,
    pub transcription: TranscriptionConfig,
    pub clips: ClipsConfig,
    pub hashtags: HashtagsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolutionConfig {
    /// Minimum similarity (0.0 to 1.0) for a quote to match a segment.
    pub similarity_threshold: f64,
    /// Clips are widened until they span at least this many seconds.
    pub min_clip_duration_secs: f64,
    /// Number of quotes to request from the model.
    pub quote_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub top_n: usize,
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// OpenAI-compatible base URL, e.g. "https://api.openai.com/v1".
    pub endpoint: String,
    /// API key (or set CLIPFORGE_LLM_KEY environment variable).
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptionConfig {
    /// Whisper-compatible base URL.
    pub endpoint: String,
    /// API key (or set CLIPFORGE_TRANSCRIPTION_KEY environment variable).
    pub api_key: String,
    pub model: String,
    pub language: String,
    pub timeout_secs: u64,
}

impl fmt::Debug for TranscriptionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranscriptionConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("language", &self.language)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipsConfig {
    pub output_dir: PathBuf,
    pub ffmpeg_path: String,
    pub video_codec: String,
    pub audio_codec: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HashtagsConfig {
    pub count: usize,
}

// --- Default implementations ---

impl Default for ResolutionConfig {
    fn default() -> Self {
        let options = ResolveOptions::default();
        Self {
            similarity_threshold: options.similarity_threshold,
            min_clip_duration_secs: options.min_clip_duration_secs,
            quote_count: 5,
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self { top_n: 3 }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1".to_string(),
            api_key: String::new(),
            model: "gpt-3.5-turbo".to_string(),
            temperature: 0.7,
            max_tokens: 1024,
            timeout_secs: 120,
        }
    }
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.lemonfox.ai/v1".to_string(),
            api_key: String::new(),
            model: "whisper-1".to_string(),
            language: "english".to_string(),
            timeout_secs: 300,
        }
    }
}

impl Default for ClipsConfig {
    fn default() -> Self {
        Self {
            output_dir: default_clips_dir(),
            ffmpeg_path: "ffmpeg".to_string(),
            video_codec: "libx264".to_string(),
            audio_codec: "aac".to_string(),
        }
    }
}

impl Default for HashtagsConfig {
    fn default() -> Self {
        Self { count: 5 }
    }
}

fn default_clips_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("clipforge")
        .join("clips")
}

impl ResolutionConfig {
    pub fn options(&self) -> ResolveOptions {
        ResolveOptions {
            similarity_threshold: self.similarity_threshold,
            min_clip_duration_secs: self.min_clip_duration_secs,
        }
    }
}

// --- Config loading ---

impl Config {
    /// Load config and return the resolved file path (if any).
    pub fn load_with_path(path: Option<&Path>) -> anyhow::Result<(Self, Option<PathBuf>)> {
        // 1. Check explicit path
        if let Some(p) = path {
            let content = std::fs::read_to_string(p).map_err(|e| {
                anyhow::anyhow!("Failed to read config file {}: {}", p.display(), e)
            })?;
            let config = Self::parse(&content)?;
            return Ok((config, Some(p.to_path_buf())));
        }

        // 2. Check beside the executable
        if let Ok(exe_path) = std::env::current_exe() {
            let beside_exe = exe_path.parent().map(|p| p.join("clipforge.toml"));
            if let Some(p) = beside_exe {
                if p.exists() {
                    let content = std::fs::read_to_string(&p)?;
                    let config = Self::parse(&content)?;
                    return Ok((config, Some(p)));
                }
            }
        }

        // 3. Check platform config directory
        if let Some(platform_config) = Self::platform_path() {
            if platform_config.exists() {
                let content = std::fs::read_to_string(&platform_config)?;
                let config = Self::parse(&content)?;
                return Ok((config, Some(platform_config)));
            }
        }

        // 4. Fall back to defaults
        tracing::info!("No config file found, using defaults");
        Ok((Config::default(), None))
    }

    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        Self::load_with_path(path).map(|(config, _)| config)
    }

    /// Parse and validate TOML content.
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// `<config_dir>/clipforge/config.toml`, if the platform has a config dir.
    pub fn platform_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("clipforge").join("config.toml"))
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let threshold = self.resolution.similarity_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            anyhow::bail!(
                "resolution.similarity_threshold must be between 0.0 and 1.0, got {}",
                threshold
            );
        }
        if !self.resolution.min_clip_duration_secs.is_finite() {
            anyhow::bail!("resolution.min_clip_duration_secs must be a finite number");
        }
        Ok(())
    }

    /// Generate a default config file with all fields and inline documentation.
    pub fn generate_default_commented() -> String {
        let output_dir_str = default_clips_dir().to_string_lossy().replace('\\', "\\\\");

        format!(
r#"# clipforge configuration

[resolution]
# Minimum similarity (0.0 to 1.0) between a quote and a transcript segment.
# Quotes scoring below this are dropped rather than matched to the wrong spot.
similarity_threshold = 0.6
# Matched segments are widened with their neighbours until the clip is at
# least this long. Transcripts shorter than this yield shorter clips.
min_clip_duration_secs = 60.0
# Number of quotes to ask the model for. Fewer highlights may come back.
quote_count = 5

[scoring]
# Number of segments kept by 'clipforge score' (sentiment fallback).
top_n = 3

[llm]
# OpenAI-compatible chat completions base URL.
endpoint = "https://api.openai.com/v1"
# API key (or set CLIPFORGE_LLM_KEY environment variable).
# api_key = ""
model = "gpt-3.5-turbo"
temperature = 0.7
max_tokens = 1024
timeout_secs = 120

[transcription]
# Whisper-compatible transcription base URL.
endpoint = "https://api.lemonfox.ai/v1"
# API key (or set CLIPFORGE_TRANSCRIPTION_KEY environment variable).
# api_key = ""
model = "whisper-1"
language = "english"
timeout_secs = 300

[clips]
# Directory where cut clips are written.
output_dir = "{output_dir}"
# ffmpeg binary (name on PATH or absolute path).
ffmpeg_path = "ffmpeg"
video_codec = "libx264"
audio_codec = "aac"

[hashtags]
# Number of hashtags to generate.
count = 5
"#,
            output_dir = output_dir_str
        )
    }
}
