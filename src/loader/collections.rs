//! Typed collections produced by one ingestion pass
//!
//! [`LoadedExport`] is built by the loader and read-only afterwards: the
//! sequences are only exposed as slices. Within each kind, records keep the
//! order they had in the log.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::errors::RecordParseWarning;
use super::event::{DataSnapshot, Decision, EventRecord, Forecast, ModuleOpinion, ParsedRecord};

/// A payload plus where it came from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadedRecord<T> {
    /// 1-based line number in the event log
    pub line_number: u64,
    /// Envelope timestamp, when the exporter wrote one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recorded_at: Option<DateTime<Utc>>,
    pub payload: T,
}

/// Counters for one ingestion pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadStats {
    /// Lines read
    pub lines_read: u64,
    /// Records appended to one of the four collections
    pub records_loaded: u64,
    /// Well-formed records of a kind this version ignores
    pub unrecognized: u64,
    /// Records dropped with a warning
    pub skipped: u64,
}

/// Result of loading one event log
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedExport {
    snapshots: Vec<LoadedRecord<DataSnapshot>>,
    decisions: Vec<LoadedRecord<Decision>>,
    opinions: Vec<LoadedRecord<ModuleOpinion>>,
    forecasts: Vec<LoadedRecord<Forecast>>,
    warnings: Vec<RecordParseWarning>,
    stats: LoadStats,
}

impl LoadedExport {
    /// Loaded data snapshots, in log order
    pub fn snapshots(&self) -> &[LoadedRecord<DataSnapshot>] {
        &self.snapshots
    }

    /// Loaded decisions, in log order
    pub fn decisions(&self) -> &[LoadedRecord<Decision>] {
        &self.decisions
    }

    /// Loaded module opinions, in log order
    pub fn opinions(&self) -> &[LoadedRecord<ModuleOpinion>] {
        &self.opinions
    }

    /// Loaded forecasts, in log order
    pub fn forecasts(&self) -> &[LoadedRecord<Forecast>] {
        &self.forecasts
    }

    /// Records dropped during loading
    pub fn warnings(&self) -> &[RecordParseWarning] {
        &self.warnings
    }

    /// Ingestion counters
    pub fn stats(&self) -> LoadStats {
        self.stats
    }

    /// Total records across the four collections
    pub fn total_records(&self) -> usize {
        self.snapshots.len() + self.decisions.len() + self.opinions.len() + self.forecasts.len()
    }

    /// Concatenates another partial load after this one, kind by kind.
    ///
    /// For loads of disjoint, consecutive slices of one log this yields the
    /// same collections as a single pass. Line numbers stay relative to the
    /// slice each record came from.
    pub fn merge(mut self, other: LoadedExport) -> Self {
        self.snapshots.extend(other.snapshots);
        self.decisions.extend(other.decisions);
        self.opinions.extend(other.opinions);
        self.forecasts.extend(other.forecasts);
        self.warnings.extend(other.warnings);

        self.stats.lines_read += other.stats.lines_read;
        self.stats.records_loaded += other.stats.records_loaded;
        self.stats.unrecognized += other.stats.unrecognized;
        self.stats.skipped += other.stats.skipped;
        self
    }

    pub(crate) fn set_lines_read(&mut self, lines_read: u64) {
        self.stats.lines_read = lines_read;
    }

    pub(crate) fn push_record(&mut self, line_number: u64, parsed: ParsedRecord) {
        let recorded_at = parsed.recorded_at;
        match parsed.record {
            EventRecord::DataSnapshot(payload) => self.snapshots.push(LoadedRecord {
                line_number,
                recorded_at,
                payload,
            }),
            EventRecord::Decision(payload) => self.decisions.push(LoadedRecord {
                line_number,
                recorded_at,
                payload,
            }),
            EventRecord::ModuleOpinion(payload) => self.opinions.push(LoadedRecord {
                line_number,
                recorded_at,
                payload,
            }),
            EventRecord::Forecast(payload) => self.forecasts.push(LoadedRecord {
                line_number,
                recorded_at,
                payload,
            }),
            EventRecord::Unrecognized { .. } => {
                self.stats.unrecognized += 1;
                return;
            }
        }
        self.stats.records_loaded += 1;
    }

    pub(crate) fn push_warning(&mut self, warning: RecordParseWarning) {
        self.stats.skipped += 1;
        self.warnings.push(warning);
    }
}
