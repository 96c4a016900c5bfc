//! Raw message sources.
//!
//! A source yields framed message buffers, one per call, and never decodes
//! them; decoding and aggregation happen in the monitor. The network
//! transport that feeds a live PACMAN is not part of this crate: anything
//! that produces concatenated message bytes (a capture file, a pipe, stdin)
//! can be wrapped in a `StreamSource`. A transport polled with a timeout
//! reports an empty poll as `SourceEvent::Idle`; only `None` ends a run.

mod stream;

pub use stream::{StreamSource, open_capture};

use thiserror::Error;

/// One framed message as received, with its byte offset in the input.
///
/// The bytes are not guaranteed to decode: a stream cut short or a header
/// that cannot be framed is still handed over, so the consumer can count it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMessage {
    pub offset: u64,
    pub bytes: Vec<u8>,
}

/// What a source produced on one poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceEvent {
    Message(RawMessage),
    /// Nothing arrived this cycle; the source is still live.
    Idle,
}

pub trait MessageSource {
    /// Next event, or `None` once the input is exhausted.
    fn next_event(&mut self) -> Result<Option<SourceEvent>, SourceError>;
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
