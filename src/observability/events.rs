//! Observable events of an analysis run
//!
//! Events are explicit and typed.

use std::fmt;

/// Observable events of an analysis run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Configuration file loaded
    ConfigLoaded,

    // Loading
    /// Event log ingestion begins
    LoadStart,
    /// Event log ingestion complete
    LoadComplete,
    /// Event log absent, analysis skipped
    LoadMissingInput,
    /// A single record was dropped
    RecordParseWarning,

    // Linkage audit
    /// Linkage audit begins
    AuditStart,
    /// Linkage audit complete
    AuditComplete,
    /// A decision failed to resolve any input
    DecisionUnlinked,

    // Output
    /// Report written to stdout
    ReportWritten,
}

impl Event {
    /// Returns the event name string
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::LoadStart => "LOAD_START",
            Event::LoadComplete => "LOAD_COMPLETE",
            Event::LoadMissingInput => "LOAD_MISSING_INPUT",
            Event::RecordParseWarning => "RECORD_PARSE_WARNING",
            Event::AuditStart => "AUDIT_START",
            Event::AuditComplete => "AUDIT_COMPLETE",
            Event::DecisionUnlinked => "DECISION_UNLINKED",
            Event::ReportWritten => "REPORT_WRITTEN",
        }
    }

    /// Returns whether this event ends the run
    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::LoadMissingInput)
    }

    /// Returns whether this event signals a recoverable defect
    pub fn is_warning(&self) -> bool {
        matches!(self, Event::RecordParseWarning)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
