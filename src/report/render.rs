//! Plain-text rendering of an [`AnalysisReport`]

use std::io::{self, Write};

use super::summary::AnalysisReport;
use crate::audit::LinkageStatus;

fn or_dash(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}

fn price(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.2}", v))
}

/// Writes the human-readable report.
pub fn render_text<W: Write>(report: &AnalysisReport, out: &mut W) -> io::Result<()> {
    let load = &report.load;
    writeln!(out, "Export: {}", load.export_path)?;
    writeln!(
        out,
        "Loaded {} snapshots, {} decisions, {} opinions, {} forecasts.",
        load.snapshots, load.decisions, load.opinions, load.forecasts
    )?;
    if load.stats.skipped > 0 {
        writeln!(out, "Skipped {} malformed record(s):", load.stats.skipped)?;
        for skipped in &load.skipped_records {
            writeln!(out, "  line {}: {}", skipped.line_number, skipped.reason)?;
        }
    }
    if load.stats.unrecognized > 0 {
        writeln!(
            out,
            "Ignored {} record(s) of unrecognized type.",
            load.stats.unrecognized
        )?;
    }
    if !load.blobs_present {
        writeln!(out, "Note: no blob directory in this export.")?;
    }

    writeln!(out)?;
    writeln!(out, "== Decision Distribution ==")?;
    if report.decision_distribution.is_empty() {
        writeln!(out, "No decisions to analyze.")?;
    } else {
        writeln!(out, "{:<12} {:>7}", "Action", "Count")?;
        for row in &report.decision_distribution {
            writeln!(out, "{:<12} {:>7}", row.action, row.count)?;
        }

        writeln!(out)?;
        writeln!(out, "== Decision Timeline ==")?;
        writeln!(out, "{:<6} {:<22} {:<10} {:<8}", "Line", "Time", "Symbol", "Action")?;
        for row in &report.decision_timeline {
            let time = row
                .recorded_at
                .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string());
            writeln!(
                out,
                "{:<6} {:<22} {:<10} {:<8}",
                row.line_number,
                or_dash(time.as_deref()),
                or_dash(row.symbol.as_deref()),
                or_dash(row.action.as_deref())
            )?;
        }
    }

    writeln!(out)?;
    writeln!(out, "== Forecast Analysis ==")?;
    let forecasts = &report.forecasts;
    if forecasts.count == 0 {
        writeln!(out, "No forecasts found to analyze.")?;
    } else {
        match forecasts.mean_confidence {
            Some(mean) => writeln!(out, "Average Confidence Score: {:.1}%", mean)?,
            None => writeln!(out, "Average Confidence Score: n/a")?,
        }
        writeln!(
            out,
            "{:<10} {:>10} {:>10} {:>7}",
            "Symbol", "Now", "Pred(5d)", "Conf%"
        )?;
        for row in &forecasts.recent {
            writeln!(
                out,
                "{:<10} {:>10} {:>10} {:>7}",
                or_dash(row.symbol.as_deref()),
                price(row.current_price),
                price(row.predicted_price_5d),
                row.confidence_score
                    .map_or_else(|| "-".to_string(), |c| format!("{:.1}", c))
            )?;
        }
    }

    writeln!(out)?;
    writeln!(out, "== Data Linkage ==")?;
    let linkage = &report.linkage;
    writeln!(
        out,
        "Decisions with Valid Data Linkage: {}/{}",
        linkage.linked_count, linkage.total_decisions
    )?;
    writeln!(out, "Integrity Score: {}", linkage.integrity)?;
    for outcome in linkage.unlinked() {
        if let LinkageStatus::Unlinked { mismatch } = &outcome.status {
            writeln!(
                out,
                "  unlinked: line {} {} {}: {}",
                outcome.line_number,
                or_dash(outcome.decision_id.as_deref()),
                or_dash(outcome.symbol.as_deref()),
                mismatch
            )?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::{EmptyAuditPolicy, LinkageAuditor};
    use crate::loader::{EventLoader, ExportLayout};
    use std::fs;
    use tempfile::TempDir;

    fn render(lines: &str, policy: EmptyAuditPolicy) -> String {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("events.jsonl"), lines).unwrap();

        let export = EventLoader::new().load(temp_dir.path()).unwrap();
        let linkage = LinkageAuditor::new(policy).audit_export(&export);
        let report =
            AnalysisReport::build(&ExportLayout::new(temp_dir.path()), &export, linkage, 5);

        let mut out = Vec::new();
        render_text(&report, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_render_empty_export() {
        let text = render("", EmptyAuditPolicy::NotApplicable);

        assert!(text.contains("Loaded 0 snapshots, 0 decisions, 0 opinions, 0 forecasts."));
        assert!(text.contains("No decisions to analyze."));
        assert!(text.contains("No forecasts found to analyze."));
        assert!(text.contains("Decisions with Valid Data Linkage: 0/0"));
        assert!(text.contains("Integrity Score: n/a"));
    }

    #[test]
    fn test_render_vacuous_policy() {
        let text = render("", EmptyAuditPolicy::VacuouslyLinked);
        assert!(text.contains("Integrity Score: 100.0%"));
    }

    #[test]
    fn test_render_lists_unlinked_and_skipped() {
        let lines = concat!(
            r#"{"type":"DataSnapshotEvent","payload":{"snapshot_id":"S1"}}"#,
            "\n",
            r#"{"type":"DecisionEvent","payload":{"decision_id":"d-1","symbol":"AAPL","action":"BUY","input_blobs":[{"hash_id":"S1"}]}}"#,
            "\n",
            r#"{"type":"DecisionEvent","payload":{"decision_id":"d-2","symbol":"MSFT","action":"SELL","input_blobs":[]}}"#,
            "\n",
            "{oops\n",
            r#"{"type":"ForecastEvent","payload":{"symbol":"AAPL","current_price":100,"predicted_price_5d":104.5,"confidence_score":72}}"#,
            "\n",
        );
        let text = render(lines, EmptyAuditPolicy::NotApplicable);

        assert!(text.contains("Skipped 1 malformed record(s):"));
        assert!(text.contains("  line 4: malformed JSON"));
        assert!(text.contains("Decisions with Valid Data Linkage: 1/2"));
        assert!(text.contains("Integrity Score: 50.0%"));
        assert!(text.contains("unlinked: line 3 d-2 MSFT: no input blobs declared"));
        assert!(text.contains("Average Confidence Score: 72.0%"));
        assert!(text.contains("104.50"));
    }
}
