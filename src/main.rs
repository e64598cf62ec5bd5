use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, ensure};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use tui_2048::game::GameConfig;
use tui_2048::modes::{AutoMode, HumanMode};

#[derive(Parser)]
#[command(name = "tui_2048")]
#[command(version, about = "2048 in the terminal")]
struct Cli {
    /// Game mode
    #[arg(long, default_value = "human")]
    mode: Mode,

    /// Board is size x size cells
    #[arg(long, default_value_t = 4, value_parser = clap::value_parser!(u8).range(2..=8))]
    size: u8,

    /// Probability that a spawned tile is a 4 instead of a 2
    #[arg(long, default_value_t = 0.1)]
    four_chance: f64,

    /// Fixed RNG seed for reproducible games
    #[arg(long)]
    seed: Option<u64>,

    /// Number of games to play in auto mode
    #[arg(long, default_value_t = 10)]
    games: usize,

    /// Tracing filter, e.g. "info" or "tui_2048=debug"
    #[arg(long, default_value = "info")]
    log: String,

    /// Write logs to this file instead of the terminal
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Clone, ValueEnum)]
enum Mode {
    /// Play with the keyboard
    Human,
    /// Headless random rollouts
    Auto,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    ensure!(
        (0.0..=1.0).contains(&cli.four_chance),
        "--four-chance must be between 0 and 1"
    );
    init_tracing(&cli)?;

    // Create game configuration from CLI arguments
    let config = GameConfig {
        grid_size: usize::from(cli.size),
        four_tile_chance: cli.four_chance,
        seed: cli.seed,
    };

    // Dispatch to appropriate mode
    match cli.mode {
        Mode::Human => {
            let mut human_mode = HumanMode::new(config);
            human_mode.run().await?;
        }
        Mode::Auto => {
            let mut auto_mode = AutoMode::new(config, cli.games);
            auto_mode.run().await?;
        }
    }

    Ok(())
}

fn init_tracing(cli: &Cli) -> Result<()> {
    let filter = EnvFilter::try_new(&cli.log).context("Invalid --log filter")?;

    match (&cli.log_file, &cli.mode) {
        (Some(path), _) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Arc::new(file))
                .with_ansi(false)
                .init();
        }
        (None, Mode::Auto) => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
        // The TUI owns the terminal; logging there needs an explicit file
        (None, Mode::Human) => {}
    }

    Ok(())
}
