use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "clipforge",
    version,
    about = "Turn transcript highlight quotes into clip-ready time ranges"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve quotes against a transcript into highlight clips
    Resolve(ResolveArgs),

    /// Pick the most emotionally charged segments (no model needed)
    Score {
        /// Transcript JSON file
        #[arg(short, long)]
        transcript: PathBuf,

        /// Number of segments to keep (defaults to [scoring] top_n)
        #[arg(long)]
        top: Option<usize>,

        /// Write the highlight manifest here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Cut the selected highlights out of this video
        #[arg(long)]
        cut: Option<PathBuf>,
    },

    /// Ask the model for highlight quotes and print them
    Extract {
        /// Transcript JSON file
        #[arg(short, long)]
        transcript: PathBuf,

        /// Number of quotes to request (defaults to [resolution] quote_count)
        #[arg(long)]
        count: Option<usize>,
    },

    /// Generate hashtags for a transcript
    Hashtags {
        /// Transcript JSON file
        #[arg(short, long)]
        transcript: PathBuf,

        /// Number of hashtags (defaults to [hashtags] count)
        #[arg(long)]
        count: Option<usize>,
    },

    /// Transcribe an audio file (or a video's audio track) into segments
    Transcribe {
        /// Audio file to transcribe
        #[arg(long, conflicts_with = "video", required_unless_present = "video")]
        audio: Option<PathBuf>,

        /// Extract the audio track from this video first
        #[arg(long)]
        video: Option<PathBuf>,

        /// Transcript JSON output path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Write a commented default config file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Transcript JSON file
    #[arg(short, long)]
    pub transcript: PathBuf,

    /// Quotes file (JSON array of strings, or one quote per line)
    #[arg(short, long, conflicts_with = "extract", required_unless_present = "extract")]
    pub quotes: Option<PathBuf>,

    /// Ask the configured model for quotes instead of reading a file
    #[arg(long)]
    pub extract: bool,

    /// Minimum clip duration in seconds
    #[arg(long)]
    pub min_duration: Option<f64>,

    /// Minimum similarity ratio (0.0 to 1.0)
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Write the highlight manifest here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Cut the resolved highlights out of this video
    #[arg(long)]
    pub cut: Option<PathBuf>,
}
