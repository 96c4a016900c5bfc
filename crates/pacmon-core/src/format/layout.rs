//! Byte offsets of the PACMAN message format.
//!
//! Word ranges are relative to the start of a 16-byte word (tag at offset 0).
//! Bytes not covered by a range are reserved: ignored on decode, zero on
//! encode.

use std::ops::Range;

pub const HEADER_LEN: usize = 8;
pub const WORD_LEN: usize = 16;
pub const PACKET_LEN: usize = 8;

pub const MSG_TYPE_OFFSET: usize = 0;
pub const MSG_TIMESTAMP_RANGE: Range<usize> = 1..5;
pub const MSG_WORD_COUNT_RANGE: Range<usize> = 6..8;

pub const MSG_TAG_DATA: u8 = b'D';
pub const MSG_TAG_REQUEST: u8 = b'?';
pub const MSG_TAG_REPLY: u8 = b'!';

pub const WORD_TYPE_OFFSET: usize = 0;

pub const WORD_TAG_DATA: u8 = b'D';
pub const WORD_TAG_TRIG: u8 = b'T';
pub const WORD_TAG_SYNC: u8 = b'S';
pub const WORD_TAG_PING: u8 = b'P';
pub const WORD_TAG_WRITE: u8 = b'W';
pub const WORD_TAG_READ: u8 = b'R';
pub const WORD_TAG_ERROR: u8 = b'E';

// Data
pub const DATA_IO_CHANNEL_OFFSET: usize = 1;
pub const DATA_TIMESTAMP_RANGE: Range<usize> = 2..6;
pub const DATA_PACKET_RANGE: Range<usize> = 8..16;

// Trig
pub const TRIG_TYPE_OFFSET: usize = 1;
pub const TRIG_TIMESTAMP_RANGE: Range<usize> = 4..8;

// Sync
pub const SYNC_TYPE_OFFSET: usize = 1;
pub const SYNC_CLK_SOURCE_OFFSET: usize = 2;
pub const SYNC_TIMESTAMP_RANGE: Range<usize> = 4..8;

// Write / Read share one shape.
pub const REGISTER_FIRST_RANGE: Range<usize> = 4..8;
pub const REGISTER_SECOND_RANGE: Range<usize> = 12..16;

// Error
pub const ERROR_CODE_OFFSET: usize = 1;

/// Total framed length for a message declaring `word_count` words.
pub const fn message_len(word_count: u16) -> usize {
    HEADER_LEN + word_count as usize * WORD_LEN
}
