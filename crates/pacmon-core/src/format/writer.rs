use std::ops::Range;

use super::layout;
use super::message::{Message, Word};

/// Fixed-size, zero-filled output buffer with big-endian field writers.
struct MessageWriter {
    buffer: Vec<u8>,
}

impl MessageWriter {
    fn with_len(len: usize) -> Self {
        Self {
            buffer: vec![0u8; len],
        }
    }

    fn put_u8(&mut self, offset: usize, value: u8) {
        self.buffer[offset] = value;
    }

    fn put_u16_be(&mut self, range: Range<usize>, value: u16) {
        self.buffer[range].copy_from_slice(&value.to_be_bytes());
    }

    fn put_u32_be(&mut self, range: Range<usize>, value: u32) {
        self.buffer[range].copy_from_slice(&value.to_be_bytes());
    }

    fn put_slice(&mut self, range: Range<usize>, bytes: &[u8]) {
        self.buffer[range].copy_from_slice(bytes);
    }

    fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }
}

/// Encode a message into its fixed wire layout; reserved bytes are zero.
///
/// # Examples
/// ```
/// use pacmon_core::{Message, MessageType, encode};
///
/// let bytes = encode(&Message::empty(MessageType::Data, 1234));
/// assert_eq!(bytes, [0x44, 0x00, 0x00, 0x04, 0xd2, 0x00, 0x00, 0x00]);
/// ```
pub fn encode(message: &Message) -> Vec<u8> {
    let mut writer = MessageWriter::with_len(message.encoded_len());
    writer.put_u8(layout::MSG_TYPE_OFFSET, message.kind.tag());
    writer.put_u32_be(layout::MSG_TIMESTAMP_RANGE, message.timestamp);
    writer.put_u16_be(layout::MSG_WORD_COUNT_RANGE, message.word_count());

    for (index, word) in message.words().iter().enumerate() {
        let base = layout::HEADER_LEN + index * layout::WORD_LEN;
        write_word(&mut writer, base, word);
    }
    writer.into_bytes()
}

fn shift(range: Range<usize>, base: usize) -> Range<usize> {
    range.start + base..range.end + base
}

fn write_word(writer: &mut MessageWriter, base: usize, word: &Word) {
    writer.put_u8(base + layout::WORD_TYPE_OFFSET, word.word_type().tag());
    match *word {
        Word::Data {
            io_channel,
            timestamp,
            packet,
        } => {
            writer.put_u8(base + layout::DATA_IO_CHANNEL_OFFSET, io_channel);
            writer.put_u32_be(shift(layout::DATA_TIMESTAMP_RANGE, base), timestamp);
            writer.put_slice(shift(layout::DATA_PACKET_RANGE, base), &packet);
        }
        Word::Trig {
            trig_type,
            timestamp,
        } => {
            writer.put_u8(base + layout::TRIG_TYPE_OFFSET, trig_type);
            writer.put_u32_be(shift(layout::TRIG_TIMESTAMP_RANGE, base), timestamp);
        }
        Word::Sync {
            sync_type,
            clk_source,
            timestamp,
        } => {
            writer.put_u8(base + layout::SYNC_TYPE_OFFSET, sync_type);
            writer.put_u8(base + layout::SYNC_CLK_SOURCE_OFFSET, clk_source);
            writer.put_u32_be(shift(layout::SYNC_TIMESTAMP_RANGE, base), timestamp);
        }
        Word::Ping => {}
        Word::Write { write1, write2 } => {
            writer.put_u32_be(shift(layout::REGISTER_FIRST_RANGE, base), write1);
            writer.put_u32_be(shift(layout::REGISTER_SECOND_RANGE, base), write2);
        }
        Word::Read { read1, read2 } => {
            writer.put_u32_be(shift(layout::REGISTER_FIRST_RANGE, base), read1);
            writer.put_u32_be(shift(layout::REGISTER_SECOND_RANGE, base), read2);
        }
        Word::Error { err } => {
            writer.put_u8(base + layout::ERROR_CODE_OFFSET, err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::encode;
    use crate::format::message::{Message, MessageType, Word};
    use crate::format::parser::decode;

    #[test]
    fn encode_data_word_layout() {
        let msg = Message::new(
            MessageType::Data,
            1234,
            vec![Word::Data {
                io_channel: 3,
                timestamp: 4321,
                packet: [0x12, 0x23, 0x34, 0x45, 0x54, 0x43, 0x32, 0x21],
            }],
        )
        .unwrap();
        let bytes = encode(&msg);
        assert_eq!(
            bytes,
            [
                0x44, 0x00, 0x00, 0x04, 0xd2, 0x00, 0x00, 0x01, // header
                0x44, 0x03, 0x00, 0x00, 0x10, 0xe1, 0x00, 0x00, // data word
                0x12, 0x23, 0x34, 0x45, 0x54, 0x43, 0x32, 0x21,
            ]
        );
    }

    #[test]
    fn encode_zero_fills_reserved_bytes() {
        let msg = Message::new(MessageType::Request, 0, vec![Word::Ping, Word::Error { err: 9 }])
            .unwrap();
        let bytes = encode(&msg);
        assert_eq!(bytes.len(), 8 + 32);
        assert_eq!(bytes[0], b'?');
        assert_eq!(bytes[8], b'P');
        assert!(bytes[9..24].iter().all(|b| *b == 0));
        assert_eq!(&bytes[24..26], &[b'E', 9]);
        assert!(bytes[26..].iter().all(|b| *b == 0));
    }

    #[test]
    fn every_variant_survives_encode_decode() {
        let words = vec![
            Word::Data {
                io_channel: 32,
                timestamp: u32::MAX,
                packet: [0xff, 0, 1, 2, 3, 4, 5, 0x40],
            },
            Word::Trig {
                trig_type: 2,
                timestamp: 77,
            },
            Word::Sync {
                sync_type: b'H',
                clk_source: 1,
                timestamp: 0xdead_beef,
            },
            Word::Ping,
            Word::Write {
                write1: 1,
                write2: 0x8000_0000,
            },
            Word::Read {
                read1: 0x1234_5678,
                read2: 0,
            },
            Word::Error { err: 0x7f },
        ];
        let msg = Message::new(MessageType::Reply, 42, words).unwrap();
        assert_eq!(decode(&encode(&msg)).unwrap(), msg);
    }
}
