//! Message-at-a-time processing loop with a wall-clock reporting tick.
//!
//! Each raw buffer is decoded and folded into the aggregator before the next
//! one is pulled from the source. A buffer that fails to decode is counted
//! and skipped; it never reaches the aggregator. An idle poll leaves the
//! counters alone. After every poll the tick is checked, and once the interval has elapsed the current snapshot is
//! handed to a `SnapshotSink`.

use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::StreamSummary;
use crate::format::decode;
use crate::source::{MessageSource, RawMessage, SourceError, SourceEvent};
use crate::stats::{StatsAggregator, StatsSnapshot};

pub const DEFAULT_REPORT_INTERVAL: Duration = Duration::from_secs(1);

/// What happens to the counters after a report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportMode {
    /// Counters keep accumulating from the start of the run.
    #[default]
    Cumulative,
    /// Counters are reset after each report, so every report covers one interval.
    Windowed,
}

/// Receives periodic snapshots.
pub trait SnapshotSink {
    fn report(&mut self, snapshot: &StatsSnapshot, summary: &StreamSummary);
}

impl<F> SnapshotSink for F
where
    F: FnMut(&StatsSnapshot, &StreamSummary),
{
    fn report(&mut self, snapshot: &StatsSnapshot, summary: &StreamSummary) {
        self(snapshot, summary)
    }
}

pub struct Monitor<S> {
    source: S,
    stats: StatsAggregator,
    summary: StreamSummary,
    interval: Duration,
    mode: ReportMode,
    last_report: Instant,
}

impl<S: MessageSource> Monitor<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            stats: StatsAggregator::new(),
            summary: StreamSummary::default(),
            interval: DEFAULT_REPORT_INTERVAL,
            mode: ReportMode::default(),
            last_report: Instant::now(),
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_mode(mut self, mode: ReportMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn stats(&self) -> &StatsAggregator {
        &self.stats
    }

    pub fn summary(&self) -> &StreamSummary {
        &self.summary
    }

    /// Decode one buffer and fold it into the counters, or count it as skipped.
    pub fn process(&mut self, raw: &RawMessage) {
        self.summary.bytes_total += raw.bytes.len() as u64;
        match decode(&raw.bytes) {
            Ok(message) => {
                self.summary.messages_total += 1;
                self.stats.record_message(&message);
            }
            Err(err) => {
                self.summary.skipped_buffers += 1;
                warn!(offset = raw.offset, error = %err, "skipping undecodable message");
            }
        }
    }

    /// Poll the source once, process what it produced, then check the tick.
    /// Returns `false` once the source is exhausted.
    pub fn step<K: SnapshotSink>(&mut self, sink: &mut K) -> Result<bool, SourceError> {
        match self.source.next_event()? {
            Some(SourceEvent::Message(raw)) => self.process(&raw),
            Some(SourceEvent::Idle) => {}
            None => return Ok(false),
        }
        self.tick(sink, Instant::now());
        Ok(true)
    }

    /// Run until the source is exhausted.
    pub fn run<K: SnapshotSink>(&mut self, sink: &mut K) -> Result<(), SourceError> {
        while self.step(sink)? {}
        Ok(())
    }

    /// Run to the end without periodic reports and return the final state.
    pub fn finish(mut self) -> Result<(StatsSnapshot, StreamSummary), SourceError> {
        self.run(&mut |_: &StatsSnapshot, _: &StreamSummary| {})?;
        Ok((self.stats.snapshot(), self.summary))
    }

    fn tick<K: SnapshotSink>(&mut self, sink: &mut K, now: Instant) {
        if now.duration_since(self.last_report) < self.interval {
            return;
        }
        let snapshot = self.stats.snapshot();
        debug!(
            messages = self.summary.messages_total,
            skipped = self.summary.skipped_buffers,
            words = snapshot.words_total,
            "reporting tick"
        );
        sink.report(&snapshot, &self.summary);
        if self.mode == ReportMode::Windowed {
            self.stats.reset();
        }
        self.last_report = now;
    }
}
