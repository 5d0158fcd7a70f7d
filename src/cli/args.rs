//! CLI argument definitions using clap
//!
//! argus-audit <EXPORT_PATH> [--config <FILE>] [--format text|json] [--tail <N>] [--log-level <LEVEL>]

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Audit decision provenance in an Argus black-box export
#[derive(Parser, Debug)]
#[command(name = "argus-audit")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the unzipped export directory
    pub export_path: PathBuf,

    /// Path to a JSON configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Rows shown in the decision timeline and recent forecasts
    #[arg(long)]
    pub tail: Option<usize>,

    /// Minimum log severity: trace, info, warn, error or fatal
    #[arg(long)]
    pub log_level: Option<String>,
}

/// Report output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable tables
    Text,
    /// A single JSON document
    Json,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
