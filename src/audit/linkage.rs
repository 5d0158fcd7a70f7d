//! Decision-to-snapshot linkage audit
//!
//! A decision is linked when at least one of its `input_blobs` carries a
//! `hash_id` equal to a loaded `snapshot_id`. Anything else is a
//! [`LinkageMismatch`], which is a classification, never an error.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::index::{SnapshotIndex, SnapshotLookup};
use crate::loader::{DataSnapshot, Decision, LoadedExport, LoadedRecord};
use crate::observability::{log_event_with_fields, Event};

/// Integrity reported when an export holds no decisions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyAuditPolicy {
    /// No ratio is defined; report "n/a"
    #[default]
    NotApplicable,
    /// Nothing is unlinked; report 100%
    VacuouslyLinked,
}

impl EmptyAuditPolicy {
    /// Returns the config string
    pub fn as_str(&self) -> &'static str {
        match self {
            EmptyAuditPolicy::NotApplicable => "not_applicable",
            EmptyAuditPolicy::VacuouslyLinked => "vacuously_linked",
        }
    }
}

impl FromStr for EmptyAuditPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not_applicable" => Ok(EmptyAuditPolicy::NotApplicable),
            "vacuously_linked" => Ok(EmptyAuditPolicy::VacuouslyLinked),
            other => Err(format!(
                "unknown empty audit policy '{}' (expected not_applicable or vacuously_linked)",
                other
            )),
        }
    }
}

/// Share of decisions with verified linkage
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", content = "percent", rename_all = "snake_case")]
pub enum IntegrityScore {
    /// `linked / total * 100`
    Percent(f64),
    /// No decisions and the policy declines to score
    NotApplicable,
}

impl IntegrityScore {
    /// Computes the score for `linked` of `total` decisions.
    pub fn compute(linked: usize, total: usize, policy: EmptyAuditPolicy) -> Self {
        if total == 0 {
            return match policy {
                EmptyAuditPolicy::NotApplicable => IntegrityScore::NotApplicable,
                EmptyAuditPolicy::VacuouslyLinked => IntegrityScore::Percent(100.0),
            };
        }
        IntegrityScore::Percent(linked as f64 / total as f64 * 100.0)
    }

    /// The percentage, if one is defined
    pub fn percent(&self) -> Option<f64> {
        match self {
            IntegrityScore::Percent(p) => Some(*p),
            IntegrityScore::NotApplicable => None,
        }
    }

    /// Whether every decision is linked
    pub fn is_complete(&self) -> bool {
        matches!(self, IntegrityScore::Percent(p) if *p >= 100.0)
    }
}

impl fmt::Display for IntegrityScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrityScore::Percent(p) => write!(f, "{:.1}%", p),
            IntegrityScore::NotApplicable => write!(f, "n/a"),
        }
    }
}

/// Why a decision is unlinked
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum LinkageMismatch {
    /// `input_blobs` is absent or empty
    NoInputBlobs,
    /// No declared reference resolves to a loaded snapshot
    UnresolvedReferences {
        /// Blob entries declared
        declared: usize,
        /// Entries without a usable `hash_id`
        malformed: usize,
    },
}

impl fmt::Display for LinkageMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkageMismatch::NoInputBlobs => write!(f, "no input blobs declared"),
            LinkageMismatch::UnresolvedReferences {
                declared,
                malformed,
            } => {
                write!(f, "none of {} input blob(s) match a snapshot", declared)?;
                if *malformed > 0 {
                    write!(f, " ({} without hash_id)", malformed)?;
                }
                Ok(())
            }
        }
    }
}

/// Linkage status of one decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LinkageStatus {
    /// First declared reference that resolved
    Linked { hash_id: String },
    Unlinked { mismatch: LinkageMismatch },
}

impl LinkageStatus {
    /// Whether the decision is linked
    pub fn is_linked(&self) -> bool {
        matches!(self, LinkageStatus::Linked { .. })
    }
}

/// Audit outcome for one decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecisionLinkage {
    /// Line of the decision in the event log
    pub line_number: u64,
    pub decision_id: Option<String>,
    pub symbol: Option<String>,
    pub status: LinkageStatus,
}

/// Aggregate result of a linkage audit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkageReport {
    pub linked_count: usize,
    pub total_decisions: usize,
    pub integrity: IntegrityScore,
    /// One entry per decision, in log order
    pub outcomes: Vec<DecisionLinkage>,
}

impl LinkageReport {
    /// `linked / total * 100`, or `None` when not applicable
    pub fn integrity_percent(&self) -> Option<f64> {
        self.integrity.percent()
    }

    /// Decisions that failed linkage, in log order
    pub fn unlinked(&self) -> impl Iterator<Item = &DecisionLinkage> {
        self.outcomes.iter().filter(|o| !o.status.is_linked())
    }

    /// Number of decisions that failed linkage
    pub fn unlinked_count(&self) -> usize {
        self.total_decisions - self.linked_count
    }
}

/// Verifies decision provenance against loaded snapshots
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkageAuditor {
    policy: EmptyAuditPolicy,
}

impl LinkageAuditor {
    /// Auditor with the given zero-decision policy
    pub fn new(policy: EmptyAuditPolicy) -> Self {
        Self { policy }
    }

    /// Returns the zero-decision policy
    pub fn policy(&self) -> EmptyAuditPolicy {
        self.policy
    }

    /// Audits the decisions of a loaded export against its snapshots.
    pub fn audit_export(&self, export: &LoadedExport) -> LinkageReport {
        self.audit(export.snapshots(), export.decisions())
    }

    /// Builds the snapshot index once, then audits every decision.
    pub fn audit(
        &self,
        snapshots: &[LoadedRecord<DataSnapshot>],
        decisions: &[LoadedRecord<Decision>],
    ) -> LinkageReport {
        let index = SnapshotIndex::build(snapshots);
        log_event_with_fields(
            Event::AuditStart,
            &[
                ("decisions", &decisions.len().to_string()),
                ("snapshot_ids", &index.len().to_string()),
                ("snapshots", &index.scanned().to_string()),
            ],
        );

        let report = self.audit_with(&index, decisions);
        let complete = report.integrity.is_complete().to_string();

        log_event_with_fields(
            Event::AuditComplete,
            &[
                ("complete", &complete),
                ("integrity", &report.integrity.to_string()),
                ("linked", &report.linked_count.to_string()),
                ("total", &report.total_decisions.to_string()),
            ],
        );
        report
    }

    /// Audits decisions against any snapshot lookup.
    pub fn audit_with<L: SnapshotLookup>(
        &self,
        lookup: &L,
        decisions: &[LoadedRecord<Decision>],
    ) -> LinkageReport {
        let outcomes: Vec<DecisionLinkage> = decisions
            .iter()
            .map(|record| {
                let status = Self::evaluate(&record.payload, lookup);
                if let LinkageStatus::Unlinked { ref mismatch } = status {
                    log_event_with_fields(
                        Event::DecisionUnlinked,
                        &[
                            ("line", &record.line_number.to_string()),
                            ("reason", &mismatch.to_string()),
                        ],
                    );
                }
                DecisionLinkage {
                    line_number: record.line_number,
                    decision_id: record.payload.decision_id.clone(),
                    symbol: record.payload.symbol.clone(),
                    status,
                }
            })
            .collect();

        let linked_count = outcomes.iter().filter(|o| o.status.is_linked()).count();
        let total_decisions = outcomes.len();

        LinkageReport {
            linked_count,
            total_decisions,
            integrity: IntegrityScore::compute(linked_count, total_decisions, self.policy),
            outcomes,
        }
    }

    /// Linkage status of a single decision. Depends on nothing but its
    /// own blobs and the lookup.
    pub fn evaluate<L: SnapshotLookup>(decision: &Decision, lookup: &L) -> LinkageStatus {
        if decision.input_blobs.is_empty() {
            return LinkageStatus::Unlinked {
                mismatch: LinkageMismatch::NoInputBlobs,
            };
        }

        let mut malformed = 0;
        for blob in &decision.input_blobs {
            match blob.hash_id.as_deref() {
                Some(hash_id) if lookup.contains_snapshot(hash_id) => {
                    return LinkageStatus::Linked {
                        hash_id: hash_id.to_string(),
                    };
                }
                Some(_) => {}
                None => malformed += 1,
            }
        }

        LinkageStatus::Unlinked {
            mismatch: LinkageMismatch::UnresolvedReferences {
                declared: decision.input_blobs.len(),
                malformed,
            },
        }
    }
}
