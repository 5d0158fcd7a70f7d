//! Reporting over a loaded and audited export
//!
//! Consumes read-only views only. Provides:
//! - Load summary with dropped records
//! - Decision distribution and timeline
//! - Forecast summary
//! - Linkage section
//!
//! Rendered as plain text here; JSON output serializes [`AnalysisReport`]
//! directly.

mod render;
mod summary;

pub use render::render_text;
pub use summary::{
    decision_distribution, decision_timeline, forecast_summary, load_summary, ActionCount,
    AnalysisReport, ForecastRow, ForecastSummary, LoadSummary, SkippedRecord, TimelineRow,
    UNKNOWN_ACTION,
};
