use crate::format::{Word, WordType};

use super::{PACKET_TYPE_MASK, PACKET_TYPE_OFFSET};

/// Semantic type encoded in a hardware packet's low two bits.
pub fn packet_type(packet: &[u8; 8]) -> WordType {
    match packet[PACKET_TYPE_OFFSET] & PACKET_TYPE_MASK {
        0b00 => WordType::Data,
        0b01 => WordType::Error,
        0b10 => WordType::Write,
        _ => WordType::Read,
    }
}

/// Effective type of a word: Data words take the type of their nested
/// packet, every other word keeps its wire type.
///
/// # Examples
/// ```
/// use pacmon_core::{Word, WordType, reclassify};
///
/// let word = Word::Data { io_channel: 1, timestamp: 0, packet: [0b11, 0, 0, 0, 0, 0, 0, 0] };
/// assert_eq!(reclassify(&word), WordType::Read);
/// assert_eq!(reclassify(&Word::Ping), WordType::Ping);
/// ```
pub fn reclassify(word: &Word) -> WordType {
    match word {
        Word::Data { packet, .. } => packet_type(packet),
        other => other.word_type(),
    }
}

#[cfg(test)]
mod tests {
    use super::reclassify;
    use crate::format::{Word, WordType};

    fn data(first: u8, rest: u8) -> Word {
        Word::Data {
            io_channel: 0,
            timestamp: 0,
            packet: [first, rest, rest, rest, rest, rest, rest, rest],
        }
    }

    #[test]
    fn low_bits_select_type_regardless_of_other_bits() {
        let expected = [
            WordType::Data,
            WordType::Error,
            WordType::Write,
            WordType::Read,
        ];
        for (bits, want) in expected.into_iter().enumerate() {
            let bits = bits as u8;
            assert_eq!(reclassify(&data(bits, 0x00)), want);
            assert_eq!(reclassify(&data(0xfc | bits, 0xff)), want);
        }
    }

    #[test]
    fn non_data_words_pass_through() {
        let words = [
            Word::Trig {
                trig_type: 0,
                timestamp: 0,
            },
            Word::Sync {
                sync_type: 0,
                clk_source: 0,
                timestamp: 0,
            },
            Word::Ping,
            Word::Write {
                write1: 3,
                write2: 3,
            },
            Word::Read { read1: 0, read2: 0 },
            Word::Error { err: 2 },
        ];
        for word in words {
            assert_eq!(reclassify(&word), word.word_type());
        }
    }
}
