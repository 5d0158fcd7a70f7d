//! CLI module for argus-audit
//!
//! One command: load an export directory, audit decision linkage, and print
//! the report as text or JSON.

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, OutputFormat};
pub use commands::{analyze, load, run, run_with};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_error, write_report, write_report_stdout};
