use std::path::PathBuf;

use clap::{Parser, Subcommand};
use puppetview::config::{ConfigError, ViewerConfig};
use puppetview::replay::{self, ReplayError};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Replay(#[from] ReplayError),
    #[error("failed to encode summary: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "puppetview", about = "Puppet viewer interaction tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a scripted interaction and print the resulting scene as JSON.
    Replay {
        script: PathBuf,
        /// Seed for random trigger choices.
        #[arg(long, env = "VIEWER_SEED", default_value_t = 0)]
        seed: u64,
        /// Print compact JSON.
        #[arg(long)]
        compact: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Replay { script, seed, compact } => run_replay(script, seed, compact).await,
    }
}

async fn run_replay(script: PathBuf, seed: u64, compact: bool) -> Result<(), CliError> {
    let config = ViewerConfig::from_env()?;
    let summary = replay::run_file(&script, config, seed).await?;
    let rendered = if compact { serde_json::to_string(&summary)? } else { serde_json::to_string_pretty(&summary)? };
    println!("{rendered}");
    Ok(())
}
