//! Linkage Auditor
//!
//! Determines, per decision, whether a declared input reference resolves to a
//! loaded snapshot, and aggregates the result into an integrity score.
//!
//! # Sequence
//!
//! 1. Build the snapshot identity index (once per run)
//! 2. Evaluate every decision independently against the index
//! 3. Count linked decisions and derive the integrity score
//!
//! # Invariants
//!
//! - Linkage is exact string equality between `hash_id` and `snapshot_id`
//! - One decision's outcome never depends on another's
//! - Malformed blob references never match and never abort the audit

mod index;
mod linkage;

pub use index::{SnapshotIndex, SnapshotLookup};
pub use linkage::{
    DecisionLinkage, EmptyAuditPolicy, IntegrityScore, LinkageAuditor, LinkageMismatch,
    LinkageReport, LinkageStatus,
};
