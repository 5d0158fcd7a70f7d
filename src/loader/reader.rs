//! Line reader for the event log
//!
//! - Lines are read strictly in file order
//! - Each line is parsed independently; a bad line never stops the reader
//! - A blank line is a defect like any other unparseable line
//! - Only I/O failures end the pass early

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use super::errors::{LoadError, LoadResult, RecordDefect, RecordParseWarning};
use super::event::{parse_record, ParsedRecord};

/// One line of the event log
#[derive(Debug, Clone, PartialEq)]
pub enum LogEntry {
    /// A line that parsed into a record (possibly of an unrecognized kind)
    Record {
        line_number: u64,
        parsed: ParsedRecord,
    },
    /// A line that was dropped
    Defect(RecordParseWarning),
}

/// Sequential reader over `events.jsonl`.
pub struct EventLogReader {
    log_path: PathBuf,
    reader: BufReader<File>,
    /// Number of lines consumed so far
    line_number: u64,
    buf: Vec<u8>,
}

impl EventLogReader {
    /// Opens an event log for reading.
    ///
    /// # Errors
    ///
    /// - `ARGUS_LOAD_MISSING_INPUT` if the file does not exist
    /// - `ARGUS_LOAD_IO_FAILED` if it exists but cannot be opened
    pub fn open(log_path: &Path) -> LoadResult<Self> {
        let file = File::open(log_path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                LoadError::missing_input(log_path)
            } else {
                LoadError::io_failed(log_path, e)
            }
        })?;

        Ok(Self {
            log_path: log_path.to_path_buf(),
            reader: BufReader::new(file),
            line_number: 0,
            buf: Vec::with_capacity(512),
        })
    }

    /// Returns the path to the event log.
    pub fn path(&self) -> &Path {
        &self.log_path
    }

    /// Returns the number of lines consumed so far.
    pub fn lines_read(&self) -> u64 {
        self.line_number
    }

    /// Reads the next line.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(entry))` for a parsed record or a dropped line
    /// - `Ok(None)` at end of file
    /// - `Err(LoadError)` if reading the file fails
    pub fn read_next(&mut self) -> LoadResult<Option<LogEntry>> {
        self.buf.clear();
        let read = self
            .reader
            .read_until(b'\n', &mut self.buf)
            .map_err(|e| LoadError::io_failed(&self.log_path, e))?;

        if read == 0 {
            return Ok(None);
        }

        self.line_number += 1;
        let line_number = self.line_number;

        let parsed = match std::str::from_utf8(&self.buf) {
            Err(_) => Err(RecordDefect::InvalidUtf8),
            Ok(text) if text.trim().is_empty() => Err(RecordDefect::BlankLine),
            Ok(text) => parse_record(text.trim()),
        };

        let entry = match parsed {
            Ok(parsed) => LogEntry::Record {
                line_number,
                parsed,
            },
            Err(defect) => LogEntry::Defect(RecordParseWarning::new(line_number, defect)),
        };
        Ok(Some(entry))
    }
}
