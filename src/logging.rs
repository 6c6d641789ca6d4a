//! File-backed tracing setup. The terminal is in raw mode with the alternate
//! screen active while the app runs, so log output must never go to stdout or
//! stderr.

use std::fs::{self, File};
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::settings::Settings;

/// Install the log subscriber when a level other than `off` was requested.
/// Problems creating the log file are reported and the app starts without
/// logging.
pub fn init(settings: &Settings) {
    if !settings.logging_enabled() {
        return;
    }
    if let Err(err) = try_init(settings) {
        eprintln!("Warning: logging disabled: {err:#}");
    }
}

fn try_init(settings: &Settings) -> Result<()> {
    let log_path = settings.log_file_path()?;
    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent).context("failed to create log directory")?;
    }
    let log_file = File::create(&log_path)
        .with_context(|| format!("failed to create log file {}", log_path.display()))?;

    let env_filter = EnvFilter::new(format!("distance_log={}", settings.log_level));

    // Ignore the error if a subscriber is already installed.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(log_file))
        .try_init();

    info!("logging to {}", log_path.display());
    Ok(())
}
