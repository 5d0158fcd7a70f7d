//! Event Loader
//!
//! Reads `<export>/events.jsonl` in a single pass and partitions the records
//! into four typed, ordered collections.
//!
//! # Sequence
//!
//! 1. Resolve the event log inside the export directory
//! 2. Fail with `ARGUS_LOAD_MISSING_INPUT` if it does not exist
//! 3. Read lines in order, parsing each independently
//! 4. Append recognized records to their collection
//! 5. Drop malformed records with a warning, ignore unrecognized kinds
//!
//! # Invariants
//!
//! - Relative order within a kind equals log order
//! - A malformed record never aborts ingestion
//! - Loading the same file twice yields identical collections

mod collections;
mod errors;
mod event;
mod layout;
mod reader;

pub use collections::{LoadStats, LoadedExport, LoadedRecord};
pub use errors::{
    LoadError, LoadErrorCode, LoadResult, RecordDefect, RecordParseWarning, Severity,
};
pub use event::{
    parse_record, BlobRef, DataSnapshot, Decision, EventKind, EventRecord, Forecast,
    ModuleOpinion, ParsedRecord, Payload,
};
pub use layout::{ExportLayout, DEFAULT_BLOBS_DIR, DEFAULT_EVENTS_FILE};
pub use reader::{EventLogReader, LogEntry};

use std::path::Path;

use crate::observability::{log_event_with_fields, Event};

/// Loads event logs from export directories
#[derive(Debug, Clone)]
pub struct EventLoader {
    events_file: String,
    blobs_dir: String,
}

impl Default for EventLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLoader {
    /// Loader using the default `events.jsonl` / `blobs` names
    pub fn new() -> Self {
        Self {
            events_file: DEFAULT_EVENTS_FILE.to_string(),
            blobs_dir: DEFAULT_BLOBS_DIR.to_string(),
        }
    }

    /// Overrides the event log file name
    pub fn with_events_file(mut self, events_file: impl Into<String>) -> Self {
        self.events_file = events_file.into();
        self
    }

    /// Overrides the blob directory name
    pub fn with_blobs_dir(mut self, blobs_dir: impl Into<String>) -> Self {
        self.blobs_dir = blobs_dir.into();
        self
    }

    /// Resolves the layout of `export_dir` under this loader's names
    pub fn layout(&self, export_dir: &Path) -> ExportLayout {
        ExportLayout::with_names(export_dir, &self.events_file, &self.blobs_dir)
    }

    /// Loads the event log of `export_dir`.
    ///
    /// # Errors
    ///
    /// - `ARGUS_LOAD_MISSING_INPUT` if the log does not exist
    /// - `ARGUS_LOAD_IO_FAILED` if reading fails midway
    ///
    /// Malformed records are never errors; see [`LoadedExport::warnings`].
    pub fn load(&self, export_dir: &Path) -> LoadResult<LoadedExport> {
        let layout = self.layout(export_dir);
        Self::load_file(layout.events_path())
    }

    /// Loads an event log by its full path.
    pub fn load_file(log_path: &Path) -> LoadResult<LoadedExport> {
        let path_field = log_path.display().to_string();

        let mut reader = match EventLogReader::open(log_path) {
            Ok(reader) => reader,
            Err(e) => {
                if e.is_missing_input() {
                    log_event_with_fields(Event::LoadMissingInput, &[("path", &path_field)]);
                }
                return Err(e);
            }
        };

        log_event_with_fields(Event::LoadStart, &[("path", &path_field)]);

        let mut export = LoadedExport::default();

        while let Some(entry) = reader.read_next()? {
            match entry {
                LogEntry::Record {
                    line_number,
                    parsed,
                } => export.push_record(line_number, parsed),
                LogEntry::Defect(warning) => {
                    let line = warning.line_number.to_string();
                    let reason = warning.defect.to_string();
                    log_event_with_fields(
                        Event::RecordParseWarning,
                        &[
                            ("defect", warning.defect.kind()),
                            ("line", &line),
                            ("reason", &reason),
                        ],
                    );
                    export.push_warning(warning);
                }
            }
        }

        export.set_lines_read(reader.lines_read());

        let stats = export.stats();
        log_event_with_fields(
            Event::LoadComplete,
            &[
                ("decisions", &export.decisions().len().to_string()),
                ("forecasts", &export.forecasts().len().to_string()),
                ("opinions", &export.opinions().len().to_string()),
                ("records", &export.total_records().to_string()),
                ("skipped", &stats.skipped.to_string()),
                ("snapshots", &export.snapshots().len().to_string()),
                ("unrecognized", &stats.unrecognized.to_string()),
            ],
        );

        Ok(export)
    }
}
