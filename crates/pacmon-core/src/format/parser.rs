use tracing::trace;

use super::error::FormatError;
use super::layout;
use super::message::{Message, MessageType, Word, WordType};
use super::reader::MessageReader;

/// Decoded 8-byte message header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub kind: MessageType,
    pub timestamp: u32,
    pub word_count: u16,
}

impl Header {
    /// Total framed length of the message this header announces.
    pub fn message_len(&self) -> usize {
        layout::message_len(self.word_count)
    }
}

/// Decode exactly one message; `buffer` must hold nothing else.
///
/// # Examples
/// ```
/// use pacmon_core::{MessageType, decode};
///
/// let msg = decode(&[0x44, 0x00, 0x00, 0x04, 0xd2, 0x00, 0x00, 0x00]).unwrap();
/// assert_eq!(msg.kind, MessageType::Data);
/// assert_eq!(msg.timestamp, 1234);
/// assert!(msg.words().is_empty());
/// ```
///
/// # Errors
/// `TruncatedMessage`, `UnknownMessageType`, `UnknownWordType`, or
/// `TrailingBytes` when the buffer is longer than the declared message.
pub fn decode(buffer: &[u8]) -> Result<Message, FormatError> {
    let (message, consumed) = decode_prefix(buffer)?;
    if consumed != buffer.len() {
        return Err(FormatError::TrailingBytes {
            expected: consumed,
            actual: buffer.len(),
        });
    }
    Ok(message)
}

/// Decode one message from the front of `buffer`, returning it with the
/// number of bytes it occupied.
pub fn decode_prefix(buffer: &[u8]) -> Result<(Message, usize), FormatError> {
    let header = parse_header(buffer)?;
    let needed = header.message_len();
    let reader = MessageReader::new(buffer);
    reader.require_len(needed)?;

    let mut words = Vec::with_capacity(usize::from(header.word_count));
    for index in 0..usize::from(header.word_count) {
        words.push(parse_word(&reader.word(index)?, index)?);
    }
    trace!(
        kind = %header.kind,
        timestamp = header.timestamp,
        words = header.word_count,
        "decoded message"
    );

    let message = Message::new(header.kind, header.timestamp, words)?;
    Ok((message, needed))
}

/// Decode only the header from the first 8 bytes of `buffer`.
pub fn parse_header(buffer: &[u8]) -> Result<Header, FormatError> {
    let reader = MessageReader::new(buffer);
    reader.require_len(layout::HEADER_LEN)?;

    let tag = reader.read_u8(layout::MSG_TYPE_OFFSET)?;
    let kind = MessageType::from_tag(tag).ok_or(FormatError::UnknownMessageType { tag })?;
    let timestamp = reader.read_u32_be(layout::MSG_TIMESTAMP_RANGE.clone())?;
    let word_count = reader.read_u16_be(layout::MSG_WORD_COUNT_RANGE.clone())?;

    Ok(Header {
        kind,
        timestamp,
        word_count,
    })
}

/// Total framed length announced by the header at the front of `buffer`.
pub fn frame_len(buffer: &[u8]) -> Result<usize, FormatError> {
    Ok(parse_header(buffer)?.message_len())
}

fn parse_word(reader: &MessageReader<'_>, index: usize) -> Result<Word, FormatError> {
    let tag = reader.read_u8(layout::WORD_TYPE_OFFSET)?;
    let word_type = WordType::from_tag(tag).ok_or(FormatError::UnknownWordType { index, tag })?;

    let word = match word_type {
        WordType::Data => Word::Data {
            io_channel: reader.read_u8(layout::DATA_IO_CHANNEL_OFFSET)?,
            timestamp: reader.read_u32_be(layout::DATA_TIMESTAMP_RANGE.clone())?,
            packet: reader.read_array(layout::DATA_PACKET_RANGE.clone())?,
        },
        WordType::Trig => Word::Trig {
            trig_type: reader.read_u8(layout::TRIG_TYPE_OFFSET)?,
            timestamp: reader.read_u32_be(layout::TRIG_TIMESTAMP_RANGE.clone())?,
        },
        WordType::Sync => Word::Sync {
            sync_type: reader.read_u8(layout::SYNC_TYPE_OFFSET)?,
            clk_source: reader.read_u8(layout::SYNC_CLK_SOURCE_OFFSET)?,
            timestamp: reader.read_u32_be(layout::SYNC_TIMESTAMP_RANGE.clone())?,
        },
        WordType::Ping => Word::Ping,
        WordType::Write => Word::Write {
            write1: reader.read_u32_be(layout::REGISTER_FIRST_RANGE.clone())?,
            write2: reader.read_u32_be(layout::REGISTER_SECOND_RANGE.clone())?,
        },
        WordType::Read => Word::Read {
            read1: reader.read_u32_be(layout::REGISTER_FIRST_RANGE.clone())?,
            read2: reader.read_u32_be(layout::REGISTER_SECOND_RANGE.clone())?,
        },
        WordType::Error => Word::Error {
            err: reader.read_u8(layout::ERROR_CODE_OFFSET)?,
        },
    };
    Ok(word)
}
