use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;

use tracing::{trace, warn};

use crate::format::{frame_len, layout};

use super::{MessageSource, RawMessage, SourceError, SourceEvent};

/// Splits a byte stream of back-to-back messages into frames.
///
/// Frame boundaries come from each header's word count. Bytes that cannot
/// form a whole frame are still handed over as a message so the consumer
/// sees them fail to decode:
/// - a stream ending inside a frame yields the partial frame, then ends;
/// - a header with an unknown tag yields that header, then the stream ends,
///   since nothing after it can be framed.
///
/// # Examples
/// ```
/// use std::io::Cursor;
///
/// use pacmon_core::{MessageSource, SourceEvent, StreamSource};
///
/// let bytes = [0x44, 0x00, 0x00, 0x04, 0xd2, 0x00, 0x00, 0x00];
/// let mut source = StreamSource::new(Cursor::new(bytes));
/// let Some(SourceEvent::Message(raw)) = source.next_event()? else {
///     panic!("expected a message");
/// };
/// assert_eq!(raw.bytes.len(), 8);
/// assert!(source.next_event()?.is_none());
/// # Ok::<(), pacmon_core::SourceError>(())
/// ```
pub struct StreamSource<R> {
    reader: R,
    offset: u64,
    framing_lost: bool,
}

impl<R: Read> StreamSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            offset: 0,
            framing_lost: false,
        }
    }

    /// Bytes consumed so far.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    fn emit(&mut self, bytes: Vec<u8>) -> Option<SourceEvent> {
        let offset = self.offset;
        self.offset += bytes.len() as u64;
        Some(SourceEvent::Message(RawMessage { offset, bytes }))
    }
}

/// Open a capture file of concatenated messages.
pub fn open_capture(path: &Path) -> Result<StreamSource<BufReader<File>>, SourceError> {
    let file = File::open(path)?;
    Ok(StreamSource::new(BufReader::new(file)))
}

impl<R: Read> MessageSource for StreamSource<R> {
    fn next_event(&mut self) -> Result<Option<SourceEvent>, SourceError> {
        if self.framing_lost {
            return Ok(None);
        }

        let mut header = [0u8; layout::HEADER_LEN];
        let got = read_full(&mut self.reader, &mut header)?;
        if got == 0 {
            return Ok(None);
        }
        if got < header.len() {
            warn!(offset = self.offset, len = got, "stream ended inside a header");
            return Ok(self.emit(header[..got].to_vec()));
        }

        let total = match frame_len(&header) {
            Ok(total) => total,
            Err(err) => {
                warn!(offset = self.offset, error = %err, "cannot frame message, ignoring rest of stream");
                self.framing_lost = true;
                return Ok(self.emit(header.to_vec()));
            }
        };

        let mut bytes = vec![0u8; total];
        bytes[..layout::HEADER_LEN].copy_from_slice(&header);
        let body = read_full(&mut self.reader, &mut bytes[layout::HEADER_LEN..])?;
        if layout::HEADER_LEN + body < total {
            warn!(
                offset = self.offset,
                needed = total,
                actual = layout::HEADER_LEN + body,
                "stream ended inside a message"
            );
            bytes.truncate(layout::HEADER_LEN + body);
        }

        trace!(offset = self.offset, len = bytes.len(), "framed message");
        Ok(self.emit(bytes))
    }
}

/// Read until `buf` is full or the reader is exhausted.
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        }
    }
    Ok(filled)
}
