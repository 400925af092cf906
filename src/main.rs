use clap::Parser;
use clipforge::cli::{Cli, Commands};
use clipforge::commands;
use clipforge::config::Config;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("clipforge=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Commands::InitConfig { force } = cli.command {
        commands::run_init_config(cli.config.as_deref(), force)?;
        return Ok(());
    }

    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Resolve(args) => commands::run_resolve(&config, &args),
        Commands::Score {
            transcript,
            top,
            output,
            cut,
        } => commands::run_score(&config, &transcript, top, output.as_deref(), cut.as_deref()),
        Commands::Extract { transcript, count } => {
            commands::run_extract(&config, &transcript, count)
        }
        Commands::Hashtags { transcript, count } => {
            commands::run_hashtags(&config, &transcript, count)
        }
        Commands::Transcribe {
            audio,
            video,
            output,
        } => commands::run_transcribe(&config, audio.as_deref(), video.as_deref(), &output),
        Commands::InitConfig { .. } => Ok(()),
    }
}
