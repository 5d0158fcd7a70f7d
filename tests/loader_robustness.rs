//! Event Log Ingestion Tests
//!
//! Covers:
//! - Per-kind order equals log order
//! - Malformed lines are dropped with a warning, never fatal
//! - Unrecognized kinds are ignored silently
//! - Loading is repeatable
//! - A missing log is the only fatal input condition

use argus_audit::loader::{EventKind, EventLoader, LoadErrorCode, RecordDefect};
use std::fs;
use tempfile::TempDir;

// =============================================================================
// Test Utilities
// =============================================================================

fn write_export(lines: &[&str]) -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mut content = lines.join("\n");
    content.push('\n');
    fs::write(temp_dir.path().join("events.jsonl"), content).unwrap();
    temp_dir
}

fn decision(id: &str) -> String {
    format!(
        r#"{{"type":"DecisionEvent","payload":{{"decision_id":"{}","action":"BUY"}}}}"#,
        id
    )
}

// =============================================================================
// Ordering
// =============================================================================

#[test]
fn test_order_preserved_within_kind() {
    let d1 = decision("d1");
    let d2 = decision("d2");
    let d3 = decision("d3");
    let temp_dir = write_export(&[
        &d1,
        r#"{"type":"DataSnapshotEvent","payload":{"snapshot_id":"s1"}}"#,
        &d2,
        r#"{"type":"ForecastEvent","payload":{"symbol":"AAPL"}}"#,
        &d3,
    ]);

    let export = EventLoader::new().load(temp_dir.path()).unwrap();

    let ids: Vec<_> = export
        .decisions()
        .iter()
        .map(|d| d.payload.decision_id.clone().unwrap())
        .collect();
    assert_eq!(ids, vec!["d1", "d2", "d3"]);

    let lines: Vec<_> = export.decisions().iter().map(|d| d.line_number).collect();
    assert_eq!(lines, vec![1, 3, 5]);
    assert_eq!(export.snapshots().len(), 1);
    assert_eq!(export.forecasts().len(), 1);
}

// =============================================================================
// Malformed Records
// =============================================================================

#[test]
fn test_malformed_lines_skipped_with_warnings() {
    let d1 = decision("d1");
    let d2 = decision("d2");
    let temp_dir = write_export(&[
        &d1,
        "{not json",
        "[1, 2, 3]",
        r#"{"type":"DecisionEvent","payload":"oops"}"#,
        "   ",
        &d2,
    ]);

    let export = EventLoader::new().load(temp_dir.path()).unwrap();

    assert_eq!(export.decisions().len(), 2);
    assert_eq!(export.warnings().len(), 4);

    let warned: Vec<_> = export.warnings().iter().map(|w| w.line_number).collect();
    assert_eq!(warned, vec![2, 3, 4, 5]);
    assert!(matches!(
        export.warnings()[0].defect,
        RecordDefect::MalformedJson(_)
    ));
    assert_eq!(export.warnings()[3].defect, RecordDefect::BlankLine);

    let stats = export.stats();
    assert_eq!(stats.lines_read, 6);
    assert_eq!(stats.records_loaded, 2);
    assert_eq!(stats.skipped, 4);
}

#[test]
fn test_oddly_typed_fields_keep_the_record() {
    let temp_dir = write_export(&[
        r#"{"type":"DecisionEvent","payload":{"decision_id":42,"symbol":"AAPL","action":"BUY"}}"#,
        r#"{"type":"DecisionEvent","payload":{"decision_id":"d2","current_price":"201.5"}}"#,
        r#"{"type":"ModuleOpinionEvent","payload":{"module":"momentum","score":"strong"}}"#,
        r#"{"type":"ForecastEvent","payload":{"symbol":"TSLA","confidence_score":"85"}}"#,
        r#"{"type":"DataSnapshotEvent","payload":{"snapshot_id":"s1","symbol":["odd"]}}"#,
    ]);

    let export = EventLoader::new().load(temp_dir.path()).unwrap();

    assert!(export.warnings().is_empty());
    assert_eq!(export.decisions().len(), 2);
    assert_eq!(export.opinions().len(), 1);
    assert_eq!(export.forecasts().len(), 1);
    assert_eq!(export.snapshots().len(), 1);

    let first = &export.decisions()[0].payload;
    assert_eq!(first.decision_id, None);
    assert_eq!(first.action.as_deref(), Some("BUY"));
    assert_eq!(first.extra["decision_id"], 42);

    assert_eq!(export.forecasts()[0].payload.confidence_score, None);
    assert_eq!(export.forecasts()[0].payload.extra["confidence_score"], "85");
    assert_eq!(export.snapshots()[0].payload.snapshot_id.as_deref(), Some("s1"));
}

#[test]
fn test_truncated_final_line_does_not_abort() {
    let temp_dir = TempDir::new().unwrap();
    let content = format!("{}\n{{\"type\":\"DecisionEv", decision("d1"));
    fs::write(temp_dir.path().join("events.jsonl"), content).unwrap();

    let export = EventLoader::new().load(temp_dir.path()).unwrap();
    assert_eq!(export.decisions().len(), 1);
    assert_eq!(export.warnings().len(), 1);
    assert_eq!(export.warnings()[0].line_number, 2);
}

#[test]
fn test_unrecognized_type_ignored_without_warning() {
    let d1 = decision("d1");
    let temp_dir = write_export(&[
        r#"{"type":"HeartbeatEvent","payload":{"seq":1}}"#,
        r#"{"payload":{"symbol":"AAPL"}}"#,
        &d1,
    ]);

    let export = EventLoader::new().load(temp_dir.path()).unwrap();

    assert_eq!(export.decisions().len(), 1);
    assert!(export.warnings().is_empty());
    assert_eq!(export.stats().unrecognized, 2);
    assert_eq!(EventKind::from_type("HeartbeatEvent"), None);
}

// =============================================================================
// Repeatability
// =============================================================================

#[test]
fn test_loading_twice_is_identical() {
    let d1 = decision("d1");
    let temp_dir = write_export(&[
        &d1,
        "garbage",
        r#"{"type":"ModuleOpinionEvent","payload":{"decision_id":"d1","module":"momentum","score":0.4}}"#,
        r#"{"type":"DataSnapshotEvent","timestamp":"2024-03-01T09:30:00Z","payload":{"snapshot_id":"s1"}}"#,
    ]);

    let loader = EventLoader::new();
    let first = loader.load(temp_dir.path()).unwrap();
    let second = loader.load(temp_dir.path()).unwrap();

    assert_eq!(first, second);
    assert!(first.snapshots()[0].recorded_at.is_some());
}

// =============================================================================
// Missing Input
// =============================================================================

#[test]
fn test_missing_log_is_fatal() {
    let temp_dir = TempDir::new().unwrap();

    let err = EventLoader::new().load(temp_dir.path()).unwrap_err();

    assert_eq!(err.code(), LoadErrorCode::ArgusLoadMissingInput);
    assert!(err.is_missing_input());
    assert!(err.to_string().contains("ARGUS_LOAD_MISSING_INPUT"));
}

#[test]
fn test_configured_file_name() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("ledger.jsonl"),
        format!("{}\n", decision("d1")),
    )
    .unwrap();

    let loader = EventLoader::new().with_events_file("ledger.jsonl");
    let export = loader.load(temp_dir.path()).unwrap();
    assert_eq!(export.decisions().len(), 1);

    assert!(EventLoader::new().load(temp_dir.path()).is_err());
}
