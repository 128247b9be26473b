use anyhow::{anyhow, Context, Result};
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Send tracing output to `log_file`, filtered by `RUST_LOG` (default `info`).
///
/// The terminal belongs to the game while it runs, so without a file no
/// subscriber is installed.
pub fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };

    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("Failed to install tracing subscriber")
}
