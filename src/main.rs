//! reticulum - gaze-based dwell selection
//!
//! Headless session runner: replays a scripted gaze session against the
//! selection engine and reports the events each target received.

mod config;
mod headless;
mod scripted_input;

use anyhow::{bail, Result};
use clap::Parser;
use config::{SessionConfig, DEFAULT_SESSION_PATH};
use headless::HeadlessConfig;
use scripted_input::GazeScript;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "reticulum", version, about = "Replay a scripted gaze session")]
struct Args {
    /// Gaze script (JSON) describing targets and timed head poses
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Session config (TOML)
    #[arg(short, long, default_value = DEFAULT_SESSION_PATH)]
    config: PathBuf,

    /// Write every fired event to this JSONL file
    #[arg(short, long)]
    events: Option<PathBuf>,

    /// Override the configured frame rate
    #[arg(long)]
    fps: Option<u32>,

    /// Stop after this many frames even if the script has steps left
    #[arg(long)]
    max_frames: Option<u64>,

    /// Write the effective session config to this path and exit
    #[arg(long)]
    write_config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    info!("Starting reticulum v{}", env!("CARGO_PKG_VERSION"));

    let mut session = SessionConfig::load_from_path(&args.config);
    if let Some(fps) = args.fps {
        session.fps = fps.max(1);
    }

    if let Some(path) = args.write_config.as_deref() {
        session.save_to_path(path)?;
        println!("Wrote session config to {}", path.display());
        return Ok(());
    }

    let Some(script_path) = args.script.as_deref() else {
        bail!("--script is required (or use --write-config)");
    };
    let script = GazeScript::from_path(script_path)?;

    let summary = headless::run(HeadlessConfig {
        session,
        script,
        events: args.events,
        max_frames: args.max_frames,
    })?;

    println!(
        "{} frames, {:.3}s, {} events{}",
        summary.frames,
        summary.elapsed,
        summary.events.len(),
        if summary.script_finished {
            ""
        } else {
            " (stopped early)"
        }
    );
    for (name, counts) in &summary.targets {
        println!(
            "{name:<16} over={} out={} long={} click={}",
            counts.over, counts.out, counts.long, counts.click
        );
    }
    Ok(())
}
