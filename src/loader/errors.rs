//! Loader error types
//!
//! Error codes:
//! - ARGUS_LOAD_MISSING_INPUT (FATAL, analysis skipped)
//! - ARGUS_LOAD_IO_FAILED (FATAL)
//!
//! Record-level defects are never errors of the load itself. They are
//! reported as [`RecordParseWarning`] values and the record is dropped.

use std::fmt;
use std::io;
use std::path::Path;

use thiserror::Error;

/// Severity levels for loader errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Record dropped, ingestion continues
    Warning,
    /// Analysis cannot proceed
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "WARNING"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Loader error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadErrorCode {
    /// The event log file does not exist
    ArgusLoadMissingInput,
    /// The event log exists but could not be read
    ArgusLoadIoFailed,
}

impl LoadErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            LoadErrorCode::ArgusLoadMissingInput => "ARGUS_LOAD_MISSING_INPUT",
            LoadErrorCode::ArgusLoadIoFailed => "ARGUS_LOAD_IO_FAILED",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        Severity::Fatal
    }
}

impl fmt::Display for LoadErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Structural load failure. No partial result accompanies it.
#[derive(Debug)]
pub struct LoadError {
    code: LoadErrorCode,
    message: String,
    source: Option<io::Error>,
}

impl LoadError {
    /// The event log was not found at `path`
    pub fn missing_input(path: &Path) -> Self {
        Self {
            code: LoadErrorCode::ArgusLoadMissingInput,
            message: format!("event log not found: {}", path.display()),
            source: None,
        }
    }

    /// Opening or reading the event log failed
    pub fn io_failed(path: &Path, source: io::Error) -> Self {
        Self {
            code: LoadErrorCode::ArgusLoadIoFailed,
            message: format!("failed to read event log {}", path.display()),
            source: Some(source),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> LoadErrorCode {
        self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns whether the log file was simply absent
    pub fn is_missing_input(&self) -> bool {
        self.code == LoadErrorCode::ArgusLoadMissingInput
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )?;
        if let Some(ref source) = self.source {
            write!(f, " (caused by: {})", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for load operations
pub type LoadResult<T> = Result<T, LoadError>;

/// Why a single record was dropped
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordDefect {
    /// The line is not valid JSON
    #[error("malformed JSON: {0}")]
    MalformedJson(String),

    /// The line is JSON but not an object
    #[error("record is not a JSON object")]
    NotAnObject,

    /// The line is not valid UTF-8
    #[error("line is not valid UTF-8")]
    InvalidUtf8,

    /// The line holds only whitespace
    #[error("blank line")]
    BlankLine,

    /// A recognized record carries a payload that is not an object
    #[error("payload of {kind} is not a JSON object")]
    PayloadNotAnObject {
        /// Declared record type
        kind: String,
    },

    /// A recognized record's payload mapping could not be decoded
    #[error("payload of {kind} does not match its shape: {reason}")]
    PayloadShape {
        /// Declared record type
        kind: String,
        /// Deserializer message
        reason: String,
    },
}

impl RecordDefect {
    /// Short machine-friendly name of the defect
    pub fn kind(&self) -> &'static str {
        match self {
            RecordDefect::MalformedJson(_) => "malformed_json",
            RecordDefect::NotAnObject => "not_an_object",
            RecordDefect::InvalidUtf8 => "invalid_utf8",
            RecordDefect::BlankLine => "blank_line",
            RecordDefect::PayloadNotAnObject { .. } => "payload_not_an_object",
            RecordDefect::PayloadShape { .. } => "payload_shape",
        }
    }
}

/// A dropped record, surfaced for visibility only
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordParseWarning {
    /// 1-based line number in the event log
    pub line_number: u64,
    /// What was wrong with the record
    pub defect: RecordDefect,
}

impl RecordParseWarning {
    /// Create a new warning
    pub fn new(line_number: u64, defect: RecordDefect) -> Self {
        Self {
            line_number,
            defect,
        }
    }
}

impl fmt::Display for RecordParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] line {}: {}",
            Severity::Warning,
            self.line_number,
            self.defect
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            LoadErrorCode::ArgusLoadMissingInput.code(),
            "ARGUS_LOAD_MISSING_INPUT"
        );
        assert_eq!(
            LoadErrorCode::ArgusLoadIoFailed.code(),
            "ARGUS_LOAD_IO_FAILED"
        );
    }

    #[test]
    fn test_missing_input_display() {
        let err = LoadError::missing_input(Path::new("/tmp/export/events.jsonl"));
        let display = format!("{}", err);

        assert!(err.is_missing_input());
        assert!(display.contains("FATAL"));
        assert!(display.contains("ARGUS_LOAD_MISSING_INPUT"));
        assert!(display.contains("/tmp/export/events.jsonl"));
        assert!(err.source().is_none());
    }

    #[test]
    fn test_io_failed_keeps_source() {
        let err = LoadError::io_failed(
            Path::new("events.jsonl"),
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );

        assert!(!err.is_missing_input());
        assert!(err.source().is_some());
        assert!(format!("{}", err).contains("denied"));
    }

    #[test]
    fn test_warning_display() {
        let warning = RecordParseWarning::new(7, RecordDefect::NotAnObject);
        let display = format!("{}", warning);

        assert!(display.contains("WARNING"));
        assert!(display.contains("line 7"));
        assert!(display.contains("not a JSON object"));
    }

    #[test]
    fn test_defect_kind_names() {
        let defect = RecordDefect::PayloadShape {
            kind: "DecisionEvent".into(),
            reason: "invalid type".into(),
        };
        assert_eq!(defect.kind(), "payload_shape");
        assert!(defect.to_string().contains("DecisionEvent"));
        assert_eq!(RecordDefect::BlankLine.kind(), "blank_line");
    }
}
