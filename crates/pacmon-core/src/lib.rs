//! pacmon core library: PACMAN telemetry decoding and channel health.
//!
//! A PACMAN controller multiplexes readout from many io channels into a
//! stream of framed messages. This crate turns those bytes into statistics:
//! the `format` codec decodes messages and words, `packet` recovers the true
//! type of each Data word and checks its parity, and `stats` folds the words
//! into per-type and per-channel counters. `source` frames raw buffers out
//! of a byte stream and `monitor` ties it together with a reporting tick.
//!
//! Decoding is pure and deterministic. The only I/O lives in `source`, and
//! the network transport that feeds a live controller is left to callers.
//!
//! Invariants:
//! - A message is exactly `8 + 16 * word_count` bytes, big-endian throughout.
//! - Decode failures never touch the counters.
//! - Counters only grow, unless a caller resets them explicitly.
//!
//! # Examples
//! ```no_run
//! use std::path::Path;
//!
//! use pacmon_core::analyze_capture_file;
//!
//! let report = analyze_capture_file(Path::new("run.bin"))?;
//! println!("messages: {}", report.summary.messages_total);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use serde::{Deserialize, Serialize};

mod analysis;
pub mod format;
pub mod monitor;
pub mod packet;
mod source;
mod stats;

pub use analysis::{AnalysisError, analyze_capture_file, analyze_source};
pub use format::{FormatError, Message, MessageType, Word, WordType, decode, decode_prefix, encode};
pub use monitor::{Monitor, ReportMode, SnapshotSink};
pub use packet::{has_valid_parity, is_downstream, reclassify};
pub use source::{MessageSource, RawMessage, SourceError, SourceEvent, StreamSource, open_capture};
pub use stats::{ConfigCountsPerStatus, DataCountsPerStatus, StatsAggregator, StatsSnapshot};

/// Current report schema version.
pub const REPORT_VERSION: u32 = 1;
/// Default timestamp used when the caller does not supply one.
pub const DEFAULT_GENERATED_AT: &str = "1970-01-01T00:00:00Z";

/// Statistics report for one input stream.
///
/// # Examples
/// ```
/// use pacmon_core::make_stub_report;
///
/// let report = make_stub_report("run.bin", 128);
/// assert_eq!(report.report_version, pacmon_core::REPORT_VERSION);
/// assert_eq!(report.stats.words_total, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Report schema version (not the binary version).
    pub report_version: u32,
    /// Tool identification metadata.
    pub tool: ToolInfo,
    /// RFC3339 timestamp representing the report generation time.
    pub generated_at: String,
    /// Input metadata.
    pub input: InputInfo,
    /// Framing and decode outcome counts.
    pub summary: StreamSummary,
    /// Final counters.
    pub stats: StatsSnapshot,
}

/// Tool metadata embedded in reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,
}

/// Input metadata embedded in reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputInfo {
    /// Input path as provided, `-` for stdin.
    pub path: String,
    /// Bytes framed from the input.
    pub bytes: u64,
}

/// What happened to the buffers pulled from a source.
///
/// # Examples
/// ```
/// use pacmon_core::StreamSummary;
///
/// let summary = StreamSummary::default();
/// assert_eq!(summary.skipped_buffers, 0);
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamSummary {
    /// Messages decoded and recorded.
    pub messages_total: u64,
    /// Buffers framed but rejected by the decoder.
    pub skipped_buffers: u64,
    /// Bytes of every framed buffer, decoded or not.
    pub bytes_total: u64,
}

/// Build a report with base fields filled and empty statistics.
pub fn make_stub_report(input_path: &str, input_bytes: u64) -> Report {
    Report {
        report_version: REPORT_VERSION,
        tool: ToolInfo {
            name: "pacmon".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        generated_at: DEFAULT_GENERATED_AT.to_string(),
        input: InputInfo {
            path: input_path.to_string(),
            bytes: input_bytes,
        },
        summary: StreamSummary::default(),
        stats: StatsSnapshot::default(),
    }
}
