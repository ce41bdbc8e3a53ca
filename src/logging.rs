// src/logging.rs

//! `tracing` subscriber setup for the binary.
//!
//! The filter comes from, in order:
//! 1. `--log-level`,
//! 2. `CELLGRAPH_LOG`, which accepts full `EnvFilter` directives
//!    (`debug`, `cellgraph::graph=trace,warn`, ...),
//! 3. `info`.
//!
//! Output goes to stderr; stdout is reserved for the SVG.

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

use crate::cli::LogLevel;

/// Name of the environment variable read when no CLI level is given.
pub const LOG_ENV: &str = "CELLGRAPH_LOG";

/// Install the global subscriber. Call once, before any logging.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let filter = build_filter(cli_level, std::env::var(LOG_ENV).ok().as_deref());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
        .context("installing tracing subscriber")?;

    Ok(())
}

/// Resolve the effective filter. Unparseable env directives fall back to
/// `info` instead of failing startup.
pub fn build_filter(cli_level: Option<LogLevel>, env: Option<&str>) -> EnvFilter {
    if let Some(level) = cli_level {
        return EnvFilter::new(level.as_str());
    }
    env.filter(|s| !s.trim().is_empty())
        .and_then(|s| EnvFilter::try_new(s.trim()).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}
