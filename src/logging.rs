// src/logging.rs
//! Tracing subscriber setup for the `cipher-assist` binary.

use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Where log lines should go.
#[derive(Debug, Clone, Copy)]
pub enum LogTarget<'a> {
    /// Standard error; fine while nothing else owns the terminal.
    Stderr,
    /// A plain-text file, for the interactive screens.
    File(&'a Path),
    /// No subscriber at all.
    Off,
}

/// Installs the global subscriber. `RUST_LOG` wins over `verbose`.
pub fn init(target: LogTarget<'_>, verbose: bool) -> anyhow::Result<()> {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    match target {
        LogTarget::Off => Ok(()),
        LogTarget::Stderr => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|e| anyhow::anyhow!(e)),
        LogTarget::File(path) => {
            let file = File::options().create(true).append(true).open(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
                .map_err(|e| anyhow::anyhow!(e))
        }
    }
}
