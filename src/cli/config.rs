//! Configuration file structure
//!
//! Optional JSON file; every key has a default:
//!
//! ```json
//! {
//!   "events_file": "events.jsonl",
//!   "blobs_dir": "blobs",
//!   "timeline_len": 5,
//!   "empty_audit": "not_applicable",
//!   "log_level": "warn"
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::args::Cli;
use super::errors::{CliError, CliResult};
use crate::audit::{EmptyAuditPolicy, LinkageAuditor};
use crate::loader::{EventLoader, DEFAULT_BLOBS_DIR, DEFAULT_EVENTS_FILE};
use crate::observability::Severity;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Event log file name inside the export
    #[serde(default = "default_events_file")]
    pub events_file: String,

    /// Blob directory name inside the export
    #[serde(default = "default_blobs_dir")]
    pub blobs_dir: String,

    /// Rows in the decision timeline and recent forecasts (default 5)
    #[serde(default = "default_timeline_len")]
    pub timeline_len: usize,

    /// Integrity reported for an export without decisions
    #[serde(default)]
    pub empty_audit: EmptyAuditPolicy,

    /// Minimum log severity (default "warn")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_events_file() -> String {
    DEFAULT_EVENTS_FILE.to_string()
}
fn default_blobs_dir() -> String {
    DEFAULT_BLOBS_DIR.to_string()
}
fn default_timeline_len() -> usize {
    5
}
fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            events_file: default_events_file(),
            blobs_dir: default_blobs_dir(),
            timeline_len: default_timeline_len(),
            empty_audit: EmptyAuditPolicy::default(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Config file if given, else defaults; then command-line overrides.
    pub fn resolve(cli: &Cli) -> CliResult<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };

        if let Some(tail) = cli.tail {
            config.timeline_len = tail;
        }
        if let Some(level) = &cli.log_level {
            config.log_level = level.clone();
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> CliResult<()> {
        validate_entry_name("events_file", &self.events_file)?;
        validate_entry_name("blobs_dir", &self.blobs_dir)?;

        if self.timeline_len == 0 {
            return Err(CliError::config_error("timeline_len must be > 0"));
        }

        self.log_severity()?;

        Ok(())
    }

    /// Parsed `log_level`
    pub fn log_severity(&self) -> CliResult<Severity> {
        self.log_level
            .parse()
            .map_err(|e: String| CliError::config_error(e))
    }

    /// Loader configured with this config's names
    pub fn loader(&self) -> EventLoader {
        EventLoader::new()
            .with_events_file(self.events_file.as_str())
            .with_blobs_dir(self.blobs_dir.as_str())
    }

    /// Auditor configured with this config's zero-decision policy
    pub fn auditor(&self) -> LinkageAuditor {
        LinkageAuditor::new(self.empty_audit)
    }
}

/// Names are single entries inside the export directory
fn validate_entry_name(key: &str, value: &str) -> CliResult<()> {
    if value.trim().is_empty() {
        return Err(CliError::config_error(format!("{} must not be empty", key)));
    }
    if value.contains('/') || value.contains('\\') || value == "." || value == ".." {
        return Err(CliError::config_error(format!(
            "Invalid {}: '{}'. Must be a plain name inside the export directory.",
            key, value
        )));
    }
    Ok(())
}
