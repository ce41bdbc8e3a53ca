// src/cli.rs

//! Command-line surface of the `cellgraph` binary (`clap` derive).

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::default_config_path;
use crate::types::{EdgeSource, IsolationMode};

/// Render the dependency DAG of a recorded execution history.
#[derive(Debug, Clone, Parser)]
#[command(name = "cellgraph", version, long_about = None)]
pub struct CliArgs {
    /// Session file to load.
    #[arg(long, value_name = "PATH", default_value_os_t = default_config_path())]
    pub config: PathBuf,

    /// SVG destination; the diagram goes to stdout when omitted.
    #[arg(long, short, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Override `[config].mode` (unprotected, loose, strict).
    #[arg(long, value_name = "MODE", value_parser = parse_mode)]
    pub mode: Option<IsolationMode>,

    /// Override `[config].edge_source` (observed, declared).
    #[arg(long, value_name = "SOURCE", value_parser = parse_edge_source)]
    pub edge_source: Option<EdgeSource>,

    /// Verbosity; falls back to `CELLGRAPH_LOG`, then `info`.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Print executions, edges and diagnostics instead of rendering.
    #[arg(long)]
    pub dry_run: bool,

    /// Use the unsimplified multigraph.
    #[arg(long)]
    pub raw: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

fn parse_mode(s: &str) -> Result<IsolationMode, String> {
    s.parse()
}

fn parse_edge_source(s: &str) -> Result<EdgeSource, String> {
    s.parse()
}

pub fn parse() -> CliArgs {
    CliArgs::parse()
}
