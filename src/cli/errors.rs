//! CLI-specific error types
//!
//! All CLI errors end the run with a non-zero exit status.

use std::fmt;
use std::io;

use crate::loader::{LoadError, LoadErrorCode};

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (stdout)
    IoError,
    /// The export could not be loaded
    LoadFailed,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "ARGUS_CLI_CONFIG_ERROR",
            Self::IoError => "ARGUS_CLI_IO_ERROR",
            Self::LoadFailed => "ARGUS_CLI_LOAD_FAILED",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
    load_code: Option<LoadErrorCode>,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            load_code: None,
        }
    }

    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Load failed; analysis skipped
    pub fn load_failed(err: &LoadError) -> Self {
        Self {
            code: CliErrorCode::LoadFailed,
            message: format!("{}; analysis skipped", err),
            load_code: Some(err.code()),
        }
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether the run stopped because the event log was absent
    pub fn is_missing_input(&self) -> bool {
        self.load_code == Some(LoadErrorCode::ArgusLoadMissingInput)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<LoadError> for CliError {
    fn from(e: LoadError) -> Self {
        Self::load_failed(&e)
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_missing_input_maps_to_load_failed() {
        let err: CliError = LoadError::missing_input(Path::new("x/events.jsonl")).into();

        assert_eq!(err.code(), &CliErrorCode::LoadFailed);
        assert!(err.is_missing_input());
        let display = err.to_string();
        assert!(display.starts_with("ARGUS_CLI_LOAD_FAILED"));
        assert!(display.contains("ARGUS_LOAD_MISSING_INPUT"));
        assert!(display.contains("analysis skipped"));
    }

    #[test]
    fn test_config_error_display() {
        let err = CliError::config_error("timeline_len must be > 0");
        assert_eq!(err.code_str(), "ARGUS_CLI_CONFIG_ERROR");
        assert_eq!(err.message(), "timeline_len must be > 0");
        assert!(!err.is_missing_input());
    }
}
