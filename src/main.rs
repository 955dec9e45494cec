//! BLOCKFALL - headless driver
//!
//! Runs the engine without a terminal: a seeded script plays commands each
//! frame and the final result is printed as text or JSON.

use anyhow::{Context, Result};
use blockfall::{Command, Game, GameStatus, Settings};
use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;
use std::time::Duration;

/// Commands the self-play script picks from, with relative weights
const SCRIPT: [(Command, u32); 7] = [
    (Command::MoveLeft, 6),
    (Command::MoveRight, 6),
    (Command::RotateCw, 3),
    (Command::RotateCcw, 2),
    (Command::SoftDrop, 4),
    (Command::Hold, 1),
    (Command::HardDrop, 2),
];

#[derive(Debug, Parser)]
#[command(name = "blockfall", version, about = "Headless falling-block engine runner")]
struct Args {
    /// Randomizer seed (overrides the settings file)
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum number of frames to simulate
    #[arg(long, default_value_t = 36_000)]
    frames: u64,

    /// Simulated frame length in milliseconds
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,

    /// Chance (0-1) that the script sends a command on a given frame
    #[arg(long, default_value_t = 0.25, value_parser = parse_rate)]
    input_rate: f64,

    /// Settings file (defaults to the platform config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the final snapshot as JSON
    #[arg(long)]
    json: bool,

    /// Log to stderr instead of a file in the temp directory
    #[arg(long)]
    log_stderr: bool,

    /// Write the default settings file and exit
    #[arg(long)]
    write_default_config: bool,
}

/// Get the blockfall temp directory, creating it if needed
fn blockfall_temp_dir() -> PathBuf {
    let dir = std::env::temp_dir().join("blockfall");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

/// Parse a probability, rejecting NaN and anything outside 0-1
fn parse_rate(value: &str) -> Result<f64, String> {
    let rate: f64 = value
        .parse()
        .map_err(|err| format!("`{value}` is not a number: {err}"))?;
    if (0.0..=1.0).contains(&rate) {
        Ok(rate)
    } else {
        Err(format!("`{value}` is not between 0 and 1"))
    }
}

fn env_filter() -> tracing_subscriber::EnvFilter {
    let filter = tracing_subscriber::EnvFilter::from_default_env();
    match "blockfall=debug".parse() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    }
}

/// Pick a weighted command from the script
fn scripted_command(rng: &mut ChaCha8Rng) -> Command {
    let total: u32 = SCRIPT.iter().map(|(_, weight)| weight).sum();
    let mut roll = rng.gen_range(0..total);
    for (command, weight) in SCRIPT {
        if roll < weight {
            return command;
        }
        roll -= weight;
    }
    Command::HardDrop
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Setup tracing; the guard must live until exit to flush the file
    let _guard = if args.log_stderr {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(env_filter())
            .init();
        None
    } else {
        let session_id: u32 = rand::random();
        let log_file = format!("{:08x}.log", session_id);
        let file_appender = tracing_appender::rolling::never(blockfall_temp_dir(), &log_file);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        tracing_subscriber::fmt()
            .with_writer(non_blocking)
            .with_env_filter(env_filter())
            .with_ansi(false)
            .init();
        tracing::info!(
            "BLOCKFALL starting up, log={}",
            blockfall_temp_dir().join(&log_file).display()
        );
        Some(guard)
    };

    if args.write_default_config {
        let path = match &args.config {
            Some(path) => {
                Settings::default().save_to(path)?;
                path.clone()
            }
            None => Settings::default().save()?,
        };
        println!("Wrote default settings to {}", path.display());
        return Ok(());
    }

    let mut settings = match &args.config {
        Some(path) => Settings::load_from(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => Settings::load().context("loading settings")?,
    };
    if args.seed.is_some() {
        settings.queue.seed = args.seed;
    }
    let script_seed = settings.queue.seed.unwrap_or_else(rand::random);
    settings.queue.seed = Some(script_seed);

    let mut game = Game::new(settings).context("starting game")?;
    let mut rng = ChaCha8Rng::seed_from_u64(script_seed ^ 0x5eed);
    let frame = Duration::from_millis(args.frame_ms);

    let mut snapshot = game.snapshot();
    let mut frames = 0;
    while frames < args.frames && snapshot.status != GameStatus::GameOver {
        if rng.gen_bool(args.input_rate) {
            game.apply(scripted_command(&mut rng));
        }
        snapshot = game.advance(frame);
        frames += 1;
    }
    tracing::info!(
        "Finished after {} frames: status={:?} score={} lines={} level={}",
        frames,
        snapshot.status,
        snapshot.score,
        snapshot.lines,
        snapshot.level
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    let seconds = Duration::from_millis(frames * args.frame_ms).as_secs_f64();
    println!("BLOCKFALL");
    println!("Seed: {}", script_seed);
    println!("Frames: {} ({:.1}s simulated)", frames, seconds);
    println!("Status: {:?}", snapshot.status);
    println!("Final Score: {}", snapshot.score);
    println!("Level: {} | Lines: {} | Pieces: {}", snapshot.level, snapshot.lines, game.score().pieces);
    if let Some(event) = snapshot.last_lock.filter(|event| event.rows_cleared > 0) {
        println!("Last clear: {}", event.label());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rate_bounds() {
        assert_eq!(parse_rate("0.3"), Ok(0.3));
        assert_eq!(parse_rate("0"), Ok(0.0));
        assert_eq!(parse_rate("1"), Ok(1.0));
        assert!(parse_rate("1.5").is_err());
        assert!(parse_rate("-0.1").is_err());
        assert!(parse_rate("NaN").is_err());
        assert!(parse_rate("often").is_err());
    }

    #[test]
    fn test_nan_input_rate_rejected_by_cli() {
        assert!(Args::try_parse_from(["blockfall", "--input-rate", "NaN"]).is_err());
        let args = Args::try_parse_from(["blockfall"]).unwrap();
        assert_eq!(args.input_rate, 0.25);
    }

    #[test]
    fn test_scripted_command_comes_from_script() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..100 {
            let command = scripted_command(&mut rng);
            assert!(SCRIPT.iter().any(|(scripted, _)| *scripted == command));
        }
    }
}
