//! On-disk layout of an export directory
//!
//! ```text
//! <export_path>/
//!   events.jsonl   one JSON record per line (required)
//!   blobs/         raw snapshot content (not read in this version)
//! ```

use std::path::{Path, PathBuf};

/// Default name of the event log inside an export
pub const DEFAULT_EVENTS_FILE: &str = "events.jsonl";

/// Default name of the blob directory inside an export
pub const DEFAULT_BLOBS_DIR: &str = "blobs";

/// Resolved paths of one export directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportLayout {
    root: PathBuf,
    events_path: PathBuf,
    blobs_path: PathBuf,
}

impl ExportLayout {
    /// Layout with the default file names
    pub fn new(root: &Path) -> Self {
        Self::with_names(root, DEFAULT_EVENTS_FILE, DEFAULT_BLOBS_DIR)
    }

    /// Layout with custom file names
    pub fn with_names(root: &Path, events_file: &str, blobs_dir: &str) -> Self {
        Self {
            root: root.to_path_buf(),
            events_path: root.join(events_file),
            blobs_path: root.join(blobs_dir),
        }
    }

    /// Export directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Event log path
    pub fn events_path(&self) -> &Path {
        &self.events_path
    }

    /// Blob directory path
    pub fn blobs_path(&self) -> &Path {
        &self.blobs_path
    }

    /// Whether the blob directory exists. Informational only.
    pub fn blobs_present(&self) -> bool {
        self.blobs_path.is_dir()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_names() {
        let layout = ExportLayout::new(Path::new("/exports/run1"));
        assert_eq!(
            layout.events_path(),
            Path::new("/exports/run1/events.jsonl")
        );
        assert_eq!(layout.blobs_path(), Path::new("/exports/run1/blobs"));
    }

    #[test]
    fn test_blobs_present() {
        let temp_dir = TempDir::new().unwrap();
        let layout = ExportLayout::new(temp_dir.path());
        assert!(!layout.blobs_present());

        fs::create_dir(temp_dir.path().join("blobs")).unwrap();
        assert!(layout.blobs_present());
    }
}
