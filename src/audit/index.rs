//! Snapshot identity index
//!
//! Built once per audit run in O(snapshots). Each blob reference is then a
//! single set-membership test, so linkage over all decisions costs
//! O(decisions x blobs) regardless of how many snapshots the export holds.

use std::collections::HashSet;

use crate::loader::{DataSnapshot, LoadedRecord};

/// Lookup of known snapshot identities
pub trait SnapshotLookup {
    /// Exact string match against a loaded `snapshot_id`
    fn contains_snapshot(&self, snapshot_id: &str) -> bool;
}

/// Set of snapshot identities borrowed from the loaded snapshots
#[derive(Debug, Clone, Default)]
pub struct SnapshotIndex<'a> {
    ids: HashSet<&'a str>,
    /// Snapshots indexed, duplicates and id-less ones included
    scanned: usize,
}

impl<'a> SnapshotIndex<'a> {
    /// Builds the index. Snapshots without a `snapshot_id` contribute nothing;
    /// duplicate ids collapse into one entry.
    pub fn build(snapshots: &'a [LoadedRecord<DataSnapshot>]) -> Self {
        let ids = snapshots
            .iter()
            .filter_map(|s| s.payload.snapshot_id.as_deref())
            .collect();

        Self {
            ids,
            scanned: snapshots.len(),
        }
    }

    /// Number of distinct identities
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether no identity is known
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Number of snapshot records the index was built from
    pub fn scanned(&self) -> usize {
        self.scanned
    }
}

impl SnapshotLookup for SnapshotIndex<'_> {
    fn contains_snapshot(&self, snapshot_id: &str) -> bool {
        self.ids.contains(snapshot_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(id: Option<&str>) -> LoadedRecord<DataSnapshot> {
        LoadedRecord {
            line_number: 1,
            recorded_at: None,
            payload: DataSnapshot {
                snapshot_id: id.map(str::to_owned),
                ..DataSnapshot::default()
            },
        }
    }

    #[test]
    fn test_exact_match_only() {
        let snapshots = vec![snapshot(Some("abc123"))];
        let index = SnapshotIndex::build(&snapshots);

        assert!(index.contains_snapshot("abc123"));
        assert!(!index.contains_snapshot("abc"));
        assert!(!index.contains_snapshot("ABC123"));
        assert!(!index.contains_snapshot("abc123 "));
    }

    #[test]
    fn test_duplicates_and_missing_ids() {
        let snapshots = vec![
            snapshot(Some("S1")),
            snapshot(Some("S1")),
            snapshot(None),
            snapshot(Some("S2")),
        ];
        let index = SnapshotIndex::build(&snapshots);

        assert_eq!(index.len(), 2);
        assert_eq!(index.scanned(), 4);
        assert!(index.contains_snapshot("S1"));
        assert!(index.contains_snapshot("S2"));
    }

    #[test]
    fn test_empty_index() {
        let index = SnapshotIndex::build(&[]);
        assert!(index.is_empty());
        assert!(!index.contains_snapshot(""));
    }
}
