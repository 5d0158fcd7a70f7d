//! CLI command implementation
//!
//! Strict sequence:
//! 1. Resolve configuration (file, then flags)
//! 2. Load the export; a missing event log stops here with no report
//! 3. Audit linkage
//! 4. Build and write the report

use std::io;
use std::path::Path;

use crate::loader::LoadedExport;
use crate::observability::{log_event, log_event_with_fields, Event, Logger};
use crate::report::AnalysisReport;

use super::args::{Cli, OutputFormat};
use super::config::Config;
use super::errors::CliResult;
use super::io::{write_error, write_report_stdout};

/// Parse arguments and run the analysis
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_with(&cli)
}

/// Run the analysis for already-parsed arguments
pub fn run_with(cli: &Cli) -> CliResult<()> {
    let result = resolve_and_analyze(cli);

    let report = match result {
        Ok(report) => report,
        Err(e) => {
            if cli.format == OutputFormat::Json {
                write_error(e.code_str(), e.message(), &mut io::stdout().lock())?;
            }
            return Err(e);
        }
    };

    write_report_stdout(&report, cli.format)?;
    log_event(Event::ReportWritten);
    Ok(())
}

fn resolve_and_analyze(cli: &Cli) -> CliResult<AnalysisReport> {
    let config = Config::resolve(cli)?;
    Logger::set_min_severity(config.log_severity()?);
    log_event_with_fields(
        Event::ConfigLoaded,
        &[
            ("blobs_dir", &config.blobs_dir),
            ("empty_audit", config.empty_audit.as_str()),
            ("events_file", &config.events_file),
        ],
    );

    analyze(&cli.export_path, &config)
}

/// Load, audit and summarize one export directory.
///
/// The auditor only runs once loading has succeeded.
pub fn analyze(export_path: &Path, config: &Config) -> CliResult<AnalysisReport> {
    let export = load(export_path, config)?;
    let linkage = config.auditor().audit_export(&export);
    let layout = config.loader().layout(export_path);

    Ok(AnalysisReport::build(
        &layout,
        &export,
        linkage,
        config.timeline_len,
    ))
}

/// Load an export directory with the configured names
pub fn load(export_path: &Path, config: &Config) -> CliResult<LoadedExport> {
    Ok(config.loader().load(export_path)?)
}
