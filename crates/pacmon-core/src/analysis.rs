use std::path::Path;

use thiserror::Error;

use crate::Report;
use crate::make_stub_report;
use crate::monitor::Monitor;
use crate::source::{MessageSource, SourceError, open_capture};

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Source error: {0}")]
    Source(#[from] SourceError),
}

/// Decode a capture file of concatenated messages into a report.
pub fn analyze_capture_file(path: &Path) -> Result<Report, AnalysisError> {
    let source = open_capture(path)?;
    analyze_source(&path.display().to_string(), source)
}

/// Drain `source` and report cumulative statistics for everything in it.
pub fn analyze_source<S: MessageSource>(
    input_path: &str,
    source: S,
) -> Result<Report, AnalysisError> {
    let (stats, summary) = Monitor::new(source).finish()?;
    let mut report = make_stub_report(input_path, summary.bytes_total);
    report.summary = summary;
    report.stats = stats;
    Ok(report)
}
