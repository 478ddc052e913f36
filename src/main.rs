use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use snapshot_preview::{replay_tape, util, DomCapture, EventTape, PreviewConfig};

#[derive(Debug, Parser)]
#[command(name = "snapshot-preview", version, about = "Replay snapshot preview event streams")]
struct Cli {
    /// Data directory (defaults to ~/.snapshot-preview)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Config file (defaults to <data-dir>/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Feed a JSONL event tape through the preview and print the outcome as JSON
    Replay {
        /// Path to the tape
        tape: PathBuf,

        /// Extra time to let cycles and restorations run after the last event
        #[arg(long, default_value_t = 100)]
        settle_ms: u64,

        /// Body of the live page the preview starts from
        #[arg(long, default_value = "<body></body>")]
        live_body: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    util::init_data_dir(cli.data_dir.clone());

    // Initialize logging to file (~/.snapshot-preview/logs/snapshot-preview.log)
    fs::create_dir_all(util::logs_dir())?;

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(util::log_file_path())?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(log_file)
        .with_ansi(false) // Disable ANSI colors in log file
        .init();

    let config = match &cli.config {
        Some(path) => PreviewConfig::load_from(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => PreviewConfig::load(),
    };

    match cli.command {
        Command::Replay {
            tape,
            settle_ms,
            live_body,
        } => {
            let events = EventTape::read_jsonl_from_path(&tape)
                .with_context(|| format!("reading tape {}", tape.display()))?;
            let live = DomCapture {
                body: live_body,
                ..DomCapture::default()
            };
            let report =
                replay_tape(&events, config, live, Duration::from_millis(settle_ms)).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
