//! Report output for the CLI
//!
//! - text: human-readable tables
//! - json: a single JSON object, `{"status":"ok","data":{...}}`
//! - UTF-8 only

use std::io::{self, Write};

use serde_json::json;

use super::args::OutputFormat;
use super::errors::CliResult;
use crate::report::{render_text, AnalysisReport};

/// Write a report in the requested format
pub fn write_report<W: Write>(
    report: &AnalysisReport,
    format: OutputFormat,
    out: &mut W,
) -> CliResult<()> {
    match format {
        OutputFormat::Text => render_text(report, out)?,
        OutputFormat::Json => {
            let response = json!({
                "status": "ok",
                "data": report,
            });
            serde_json::to_writer(&mut *out, &response)?;
            writeln!(out)?;
        }
    }
    out.flush()?;
    Ok(())
}

/// Write a report to stdout
pub fn write_report_stdout(report: &AnalysisReport, format: OutputFormat) -> CliResult<()> {
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    write_report(report, format, &mut lock)
}

/// Write an error object to stdout (json format only)
pub fn write_error<W: Write>(code: &str, message: &str, out: &mut W) -> CliResult<()> {
    let response = json!({
        "status": "error",
        "code": code,
        "message": message
    });

    serde_json::to_writer(&mut *out, &response)?;
    writeln!(out)?;
    out.flush()?;

    Ok(())
}
