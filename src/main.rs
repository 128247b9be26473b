use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use wrap_snake::game::{GameConfig, GameEngine};
use wrap_snake::logging::init_tracing;
use wrap_snake::modes::HumanMode;
use wrap_snake::platform::TerminalPlatform;

#[derive(Parser)]
#[command(name = "wrap_snake")]
#[command(version, about = "Snake on a wraparound board")]
struct Cli {
    /// Seed for food placement, for reproducible games
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file (filtered by RUST_LOG)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_file.as_deref())?;

    let config = GameConfig::default();
    config.validate().context("Invalid game configuration")?;
    info!(
        config = %serde_json::to_string(&config).context("Failed to serialize config")?,
        seed = ?cli.seed,
        "starting"
    );

    let engine = match cli.seed {
        Some(seed) => GameEngine::with_seed(config.clone(), seed),
        None => GameEngine::new(config.clone()),
    };
    let platform = TerminalPlatform::new(&config)?;
    let mut human_mode = HumanMode::new(engine, platform);

    // Run game loop with cleanup
    let result = human_mode.run().await;
    human_mode.platform_mut().restore()?;

    result
}
