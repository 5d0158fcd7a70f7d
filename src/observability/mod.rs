//! Observability for analysis runs
//!
//! Provides:
//! - Structured logging (JSON, one line per event, on stderr)
//! - Typed lifecycle events
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on loading or auditing
//! 3. No async or background threads
//! 4. Deterministic output
//!
//! # Usage
//!
//! ```ignore
//! use argus_audit::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::LoadComplete, &[("decisions", "42")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Returns the severity a lifecycle event is logged at
pub fn severity_of(event: Event) -> Severity {
    if event.is_fatal() {
        Severity::Error
    } else if event.is_warning() {
        Severity::Warn
    } else {
        Severity::Info
    }
}

/// Log a lifecycle event
pub fn log_event(event: Event) {
    Logger::log(severity_of(event), event.as_str(), &[]);
}

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(severity_of(event), event.as_str(), fields);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_severity_mapping() {
        assert_eq!(severity_of(Event::LoadMissingInput), Severity::Error);
        assert_eq!(severity_of(Event::RecordParseWarning), Severity::Warn);
        assert_eq!(severity_of(Event::DecisionUnlinked), Severity::Info);
        assert_eq!(severity_of(Event::AuditComplete), Severity::Info);
    }

    #[test]
    fn test_log_event() {
        // This just verifies no panic
        log_event(Event::LoadStart);
        log_event(Event::LoadComplete);
    }

    #[test]
    fn test_log_event_with_fields() {
        log_event_with_fields(Event::ConfigLoaded, &[("events_file", "events.jsonl")]);
    }
}
