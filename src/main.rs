//! race-bot: plays one team of the b12 car race over stdin/stdout.

use clap::Parser;
use race_game_types::policy::{PolicyConfig, RacePolicy, PRESET_NAMES};
use race_game_types::runner::Runner;
use race_game_types::types::TeamId;
use std::error::Error;
use std::io;
use std::path::PathBuf;
use tracing::{info, Level};

/// Reads one game state per line on stdin and answers with one order per line on stdout
#[derive(Parser, Debug)]
#[command(name = "race-bot")]
#[command(version, about, long_about = None)]
struct Args {
    /// Id of the team this bot plays for
    team_id: TeamId,

    /// Named policy preset to start from
    #[arg(short, long, default_value = "canonical")]
    preset: String,

    /// JSON file whose keys override the preset
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbosity of the diagnostics written to stderr
    #[arg(long, default_value = "info")]
    log_level: Level,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    // stdout carries the protocol, diagnostics go to stderr
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(args.log_level)
        .init();

    let mut config = PolicyConfig::preset(&args.preset)?;
    if let Some(path) = args.config.as_deref() {
        config = config.with_overrides_from_file(path)?;
    }
    info!(
        team_id = args.team_id,
        preset = %args.preset,
        presets = ?PRESET_NAMES,
        "starting with {:?}",
        config
    );

    let runner = Runner::new(RacePolicy::new(args.team_id, config));
    let stdin = io::stdin();
    runner.run(stdin.lock(), io::stdout())?;
    Ok(())
}
