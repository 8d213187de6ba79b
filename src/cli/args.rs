//! CLI argument parsing

use clap::Parser;
use std::path::PathBuf;

/// Parsed CLI arguments
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(
    name = "reflect",
    version,
    about = "Mental wellness reflection companion: write a reflection, get gentle feedback"
)]
pub struct Args {
    /// Configuration file (TOML, JSON or YAML)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Address to listen on
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Log filter, e.g. "debug" or "reflect_api=debug"
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    /// Use the offline stub feedback service (no API key needed)
    #[arg(long)]
    pub offline: bool,
}
