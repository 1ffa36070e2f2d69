//! Shared setup for the `calc-agent` and `simple-calc` binaries

use anyhow::{anyhow, Context, Result};
use log::LevelFilter;
use std::fs::OpenOptions;
use std::path::Path;

/// Parse a `--log-level` or `logging.level` value, case-insensitively.
pub fn parse_level(level: &str) -> Result<LevelFilter> {
    level.parse().map_err(|_| {
        anyhow!(
            "Invalid log level '{}' (expected off, error, warn, info, debug or trace)",
            level
        )
    })
}

/// Initialize env_logger at `level`. With a `log_file`, output goes there so
/// interactive prompts on the terminal stay clean.
pub fn init_logging(level: &str, log_file: Option<&Path>) -> Result<()> {
    let filter = parse_level(level)?;
    let mut builder = env_logger::Builder::new();
    builder.filter_level(filter);

    if let Some(path) = log_file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.try_init().context("Logger already initialized")?;
    Ok(())
}
