//! Report data derived from a loaded export
//!
//! Everything here is computed from read-only views of the loaded collections
//! and the linkage report. Nothing flows back into loading or auditing.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::audit::LinkageReport;
use crate::loader::{ExportLayout, LoadStats, LoadedExport, LoadedRecord};

/// Label used for decisions without an `action`
pub const UNKNOWN_ACTION: &str = "UNKNOWN";

/// A dropped record, as shown to the reader
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRecord {
    pub line_number: u64,
    pub defect: &'static str,
    pub reason: String,
}

/// What was loaded and from where
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    pub export_path: String,
    pub events_path: String,
    pub blobs_present: bool,
    pub snapshots: usize,
    pub decisions: usize,
    pub opinions: usize,
    pub forecasts: usize,
    pub stats: LoadStats,
    pub skipped_records: Vec<SkippedRecord>,
}

/// Number of decisions per action
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionCount {
    pub action: String,
    pub count: usize,
}

/// One row of the decision timeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineRow {
    pub line_number: u64,
    pub recorded_at: Option<DateTime<Utc>>,
    pub symbol: Option<String>,
    pub action: Option<String>,
}

/// One row of the recent forecasts table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastRow {
    pub line_number: u64,
    pub symbol: Option<String>,
    pub current_price: Option<f64>,
    pub predicted_price_5d: Option<f64>,
    pub confidence_score: Option<f64>,
}

/// Forecast activity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastSummary {
    pub count: usize,
    /// Mean over forecasts that carry a `confidence_score`
    pub mean_confidence: Option<f64>,
    pub recent: Vec<ForecastRow>,
}

/// Full analysis of one export
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub load: LoadSummary,
    pub decision_distribution: Vec<ActionCount>,
    pub decision_timeline: Vec<TimelineRow>,
    pub forecasts: ForecastSummary,
    pub linkage: LinkageReport,
}

impl AnalysisReport {
    /// Assembles the report. `timeline_len` bounds the timeline and recent
    /// forecast rows.
    pub fn build(
        layout: &ExportLayout,
        export: &LoadedExport,
        linkage: LinkageReport,
        timeline_len: usize,
    ) -> Self {
        Self {
            load: load_summary(layout, export),
            decision_distribution: decision_distribution(export),
            decision_timeline: decision_timeline(export, timeline_len),
            forecasts: forecast_summary(export, timeline_len),
            linkage,
        }
    }
}

/// Load counters plus the dropped records
pub fn load_summary(layout: &ExportLayout, export: &LoadedExport) -> LoadSummary {
    LoadSummary {
        export_path: layout.root().display().to_string(),
        events_path: layout.events_path().display().to_string(),
        blobs_present: layout.blobs_present(),
        snapshots: export.snapshots().len(),
        decisions: export.decisions().len(),
        opinions: export.opinions().len(),
        forecasts: export.forecasts().len(),
        stats: export.stats(),
        skipped_records: export
            .warnings()
            .iter()
            .map(|w| SkippedRecord {
                line_number: w.line_number,
                defect: w.defect.kind(),
                reason: w.defect.to_string(),
            })
            .collect(),
    }
}

/// Decisions per action, most frequent first, ties by action name
pub fn decision_distribution(export: &LoadedExport) -> Vec<ActionCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in export.decisions() {
        let action = record.payload.action.as_deref().unwrap_or(UNKNOWN_ACTION);
        *counts.entry(action).or_insert(0) += 1;
    }

    let mut distribution: Vec<ActionCount> = counts
        .into_iter()
        .map(|(action, count)| ActionCount {
            action: action.to_string(),
            count,
        })
        .collect();
    distribution.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.action.cmp(&b.action)));
    distribution
}

/// The last `len` decisions, in log order
pub fn decision_timeline(export: &LoadedExport, len: usize) -> Vec<TimelineRow> {
    tail(export.decisions(), len)
        .iter()
        .map(|record| TimelineRow {
            line_number: record.line_number,
            recorded_at: record.recorded_at,
            symbol: record.payload.symbol.clone(),
            action: record.payload.action.clone(),
        })
        .collect()
}

/// Mean confidence and the last `len` forecasts
pub fn forecast_summary(export: &LoadedExport, len: usize) -> ForecastSummary {
    let scores: Vec<f64> = export
        .forecasts()
        .iter()
        .filter_map(|f| f.payload.confidence_score)
        .collect();

    let mean_confidence = if scores.is_empty() {
        None
    } else {
        Some(scores.iter().sum::<f64>() / scores.len() as f64)
    };

    let recent = tail(export.forecasts(), len)
        .iter()
        .map(|record| ForecastRow {
            line_number: record.line_number,
            symbol: record.payload.symbol.clone(),
            current_price: record.payload.current_price,
            predicted_price_5d: record.payload.predicted_price_5d,
            confidence_score: record.payload.confidence_score,
        })
        .collect();

    ForecastSummary {
        count: export.forecasts().len(),
        mean_confidence,
        recent,
    }
}

fn tail<T>(records: &[LoadedRecord<T>], len: usize) -> &[LoadedRecord<T>] {
    &records[records.len().saturating_sub(len)..]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::LinkageAuditor;
    use crate::loader::EventLoader;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn load(lines: &[&str]) -> (TempDir, LoadedExport) {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("events.jsonl"), lines.join("\n")).unwrap();
        let export = EventLoader::new().load(temp_dir.path()).unwrap();
        (temp_dir, export)
    }

    fn decision_line(action: Option<&str>, symbol: &str) -> String {
        match action {
            Some(a) => format!(
                r#"{{"type":"DecisionEvent","payload":{{"symbol":"{}","action":"{}"}}}}"#,
                symbol, a
            ),
            None => format!(
                r#"{{"type":"DecisionEvent","payload":{{"symbol":"{}"}}}}"#,
                symbol
            ),
        }
    }

    #[test]
    fn test_distribution_order() {
        let lines = [
            decision_line(Some("HOLD"), "A"),
            decision_line(Some("BUY"), "B"),
            decision_line(Some("SELL"), "C"),
            decision_line(Some("BUY"), "D"),
            decision_line(None, "E"),
            decision_line(Some("SELL"), "F"),
        ];
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let (_dir, export) = load(&refs);

        let distribution = decision_distribution(&export);
        let pairs: Vec<_> = distribution
            .iter()
            .map(|c| (c.action.as_str(), c.count))
            .collect();

        assert_eq!(
            pairs,
            vec![("BUY", 2), ("SELL", 2), ("HOLD", 1), (UNKNOWN_ACTION, 1)]
        );
    }

    #[test]
    fn test_timeline_keeps_last_rows_in_order() {
        let lines: Vec<String> = (0..7)
            .map(|i| decision_line(Some("BUY"), &format!("S{}", i)))
            .collect();
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let (_dir, export) = load(&refs);

        let timeline = decision_timeline(&export, 5);
        let symbols: Vec<_> = timeline
            .iter()
            .map(|r| r.symbol.clone().unwrap())
            .collect();
        assert_eq!(symbols, vec!["S2", "S3", "S4", "S5", "S6"]);

        assert_eq!(decision_timeline(&export, 50).len(), 7);
    }

    #[test]
    fn test_forecast_mean_skips_missing_scores() {
        let (_dir, export) = load(&[
            r#"{"type":"ForecastEvent","payload":{"symbol":"A","confidence_score":80}}"#,
            r#"{"type":"ForecastEvent","payload":{"symbol":"B","confidence_score":60.0}}"#,
            r#"{"type":"ForecastEvent","payload":{"symbol":"C"}}"#,
        ]);

        let summary = forecast_summary(&export, 2);
        assert_eq!(summary.count, 3);
        assert_eq!(summary.mean_confidence, Some(70.0));
        assert_eq!(summary.recent.len(), 2);
        assert_eq!(summary.recent[0].symbol.as_deref(), Some("B"));
    }

    #[test]
    fn test_no_forecasts() {
        let (_dir, export) = load(&[]);
        let summary = forecast_summary(&export, 5);
        assert_eq!(summary.count, 0);
        assert_eq!(summary.mean_confidence, None);
        assert!(summary.recent.is_empty());
    }

    #[test]
    fn test_build_report() {
        let (dir, export) = load(&[
            r#"{"type":"DataSnapshotEvent","payload":{"snapshot_id":"S1"}}"#,
            r#"{"type":"DecisionEvent","payload":{"action":"BUY","input_blobs":[{"hash_id":"S1"}]}}"#,
            "not json",
        ]);
        let layout = ExportLayout::new(dir.path());
        let linkage = LinkageAuditor::default().audit_export(&export);

        let report = AnalysisReport::build(&layout, &export, linkage, 5);

        assert_eq!(report.load.snapshots, 1);
        assert_eq!(report.load.decisions, 1);
        assert_eq!(report.load.skipped_records.len(), 1);
        assert_eq!(report.load.skipped_records[0].line_number, 3);
        assert_eq!(report.load.skipped_records[0].defect, "malformed_json");
        assert!(!report.load.blobs_present);
        assert_eq!(report.linkage.integrity_percent(), Some(100.0));
        assert_eq!(
            Path::new(&report.load.events_path),
            dir.path().join("events.jsonl")
        );
    }
}
