mod cli;
mod config;
mod corpus;
mod dataset;
mod embedding;
mod pipeline;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "papermap",
    version,
    about = "Turn labeled paper corpora into an embedded dataset for similarity mapping"
)]
struct Cli {
    /// Path to the config file (default: papermap.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the full pipeline: load sources, embed, write the dataset
    Run,
    /// Validate config and sources without calling the embedding service
    Check,
    /// Summarize an existing dataset container
    Inspect {
        /// Dataset file (defaults to the configured output path)
        file: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(config::default_config_path);
    let config = config::PapermapConfig::load_from(&config_path)?;

    // Initialize tracing with the configured log level.
    // Log to stderr so stdout stays clean for reports and shell pipelines.
    let filter =
        EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Run => {
            let cancel = pipeline::CancelToken::new();
            let handle = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::warn!("interrupt received, stopping the run");
                    handle.cancel();
                }
            });
            cli::run::run(&config, cancel).await?;
        }
        Command::Check => {
            cli::check::check(&config, &config_path)?;
        }
        Command::Inspect { file } => {
            let path = file.unwrap_or_else(|| config.resolved_output_path());
            cli::inspect::inspect(&path)?;
        }
    }

    Ok(())
}
