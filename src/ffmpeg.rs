use anyhow::{anyhow, Context, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::config::ClipsConfig;
use crate::transcript::Highlight;

/// Cuts highlight intervals out of a source video with the `ffmpeg` binary.
#[derive(Debug, Clone)]
pub struct ClipCutter {
    ffmpeg_path: String,
    output_dir: PathBuf,
    video_codec: String,
    audio_codec: String,
}

impl ClipCutter {
    pub fn new(config: &ClipsConfig) -> Self {
        Self {
            ffmpeg_path: config.ffmpeg_path.clone(),
            output_dir: config.output_dir.clone(),
            video_codec: config.video_codec.clone(),
            audio_codec: config.audio_codec.clone(),
        }
    }

    /// `<output_dir>/<video_stem>_clip_<index>.mp4`
    pub fn clip_path(&self, video: &Path, index: usize) -> PathBuf {
        let stem = video
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "video".to_string());
        self.output_dir.join(format!("{}_clip_{}.mp4", stem, index))
    }

    fn clip_args(&self, video: &Path, start: f64, end: f64, output: &Path) -> Result<Vec<OsString>> {
        if !(start.is_finite() && end.is_finite()) || start < 0.0 || start >= end {
            return Err(anyhow!(
                "Invalid clip interval {:.3}-{:.3}: start must be non-negative and before end",
                start,
                end
            ));
        }

        let mut args: Vec<OsString> = ["-y", "-ss"].iter().map(OsString::from).collect();
        args.push(format!("{:.3}", start).into());
        args.push("-t".into());
        args.push(format!("{:.3}", end - start).into());
        args.push("-i".into());
        args.push(video.as_os_str().to_owned());
        args.extend(
            [
                "-c:v",
                self.video_codec.as_str(),
                "-c:a",
                self.audio_codec.as_str(),
            ]
            .iter()
            .map(OsString::from),
        );
        args.push(output.as_os_str().to_owned());
        Ok(args)
    }

    /// Cut one clip and return its path.
    pub fn cut(&self, video: &Path, start: f64, end: f64, index: usize) -> Result<PathBuf> {
        let output = self.clip_path(video, index);
        let args = self.clip_args(video, start, end, &output)?;

        std::fs::create_dir_all(&self.output_dir)
            .with_context(|| format!("Failed to create {}", self.output_dir.display()))?;

        run_ffmpeg(&self.ffmpeg_path, &args)?;
        tracing::info!("Clip generated: {}", output.display());
        Ok(output)
    }

    /// Cut every highlight, continuing past individual failures. Returns the
    /// paths of clips that were produced.
    pub fn cut_all(&self, video: &Path, highlights: &[Highlight]) -> Vec<PathBuf> {
        let mut produced = Vec::new();
        for (index, highlight) in highlights.iter().enumerate() {
            match self.cut(video, highlight.start, highlight.end, index) {
                Ok(path) => produced.push(path),
                Err(e) => tracing::error!("Failed to cut clip {}: {:#}", index, e),
            }
        }
        produced
    }

    /// Extract a 16 kHz mp3 audio track for transcription.
    pub fn extract_audio(&self, video: &Path, output: &Path) -> Result<PathBuf> {
        let output = output.with_extension("mp3");
        let args = audio_args(video, &output);
        run_ffmpeg(&self.ffmpeg_path, &args)?;
        tracing::info!("Audio extracted: {}", output.display());
        Ok(output)
    }
}

fn audio_args(video: &Path, output: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["-y".into(), "-i".into(), video.as_os_str().to_owned()];
    args.extend(
        ["-vn", "-acodec", "mp3", "-ar", "16000"]
            .iter()
            .map(OsString::from),
    );
    args.push(output.as_os_str().to_owned());
    args
}

fn run_ffmpeg(ffmpeg_path: &str, args: &[OsString]) -> Result<()> {
    tracing::debug!("Running {} {:?}", ffmpeg_path, args);
    let output = Command::new(ffmpeg_path)
        .args(args)
        .output()
        .with_context(|| format!("Failed to execute {}", ffmpeg_path))?;

    if !output.status.success() {
        return Err(anyhow!(
            "ffmpeg failed: {}",
            String::from_utf8_lossy(&output.stderr)
        ));
    }
    Ok(())
}
