use std::ops::Range;

use super::error::FormatError;
use super::layout;

/// Bounds-checked, big-endian access to a message buffer.
pub struct MessageReader<'a> {
    payload: &'a [u8],
}

impl<'a> MessageReader<'a> {
    pub fn new(payload: &'a [u8]) -> Self {
        Self { payload }
    }

    pub fn len(&self) -> usize {
        self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    pub fn require_len(&self, needed: usize) -> Result<(), FormatError> {
        if self.payload.len() < needed {
            return Err(FormatError::TruncatedMessage {
                needed,
                actual: self.payload.len(),
            });
        }
        Ok(())
    }

    pub fn read_u8(&self, offset: usize) -> Result<u8, FormatError> {
        self.payload
            .get(offset)
            .copied()
            .ok_or(FormatError::TruncatedMessage {
                needed: offset + 1,
                actual: self.payload.len(),
            })
    }

    pub fn read_u16_be(&self, range: Range<usize>) -> Result<u16, FormatError> {
        Ok(u16::from_be_bytes(self.read_array(range)?))
    }

    pub fn read_u32_be(&self, range: Range<usize>) -> Result<u32, FormatError> {
        Ok(u32::from_be_bytes(self.read_array(range)?))
    }

    pub fn read_array<const N: usize>(&self, range: Range<usize>) -> Result<[u8; N], FormatError> {
        let bytes = self.read_slice(range)?;
        bytes.try_into().map_err(|_| FormatError::TruncatedMessage {
            needed: N,
            actual: bytes.len(),
        })
    }

    pub fn read_slice(&self, range: Range<usize>) -> Result<&'a [u8], FormatError> {
        self.payload
            .get(range.clone())
            .ok_or(FormatError::TruncatedMessage {
                needed: range.end,
                actual: self.payload.len(),
            })
    }

    /// Reader over the `index`-th word following the header.
    pub fn word(&self, index: usize) -> Result<MessageReader<'a>, FormatError> {
        let start = layout::HEADER_LEN + index * layout::WORD_LEN;
        let bytes = self.read_slice(start..start + layout::WORD_LEN)?;
        Ok(MessageReader::new(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::MessageReader;
    use crate::format::error::FormatError;

    #[test]
    fn reads_big_endian_integers() {
        let bytes = [0x00, 0x00, 0x04, 0xd2, 0x01, 0x02];
        let reader = MessageReader::new(&bytes);
        assert_eq!(reader.read_u32_be(0..4).unwrap(), 1234);
        assert_eq!(reader.read_u16_be(4..6).unwrap(), 0x0102);
    }

    #[test]
    fn out_of_range_reports_needed_length() {
        let bytes = [0u8; 3];
        let reader = MessageReader::new(&bytes);
        let err = reader.read_u32_be(0..4).unwrap_err();
        assert_eq!(
            err,
            FormatError::TruncatedMessage {
                needed: 4,
                actual: 3
            }
        );
        assert!(reader.read_u8(3).is_err());
    }

    #[test]
    fn empty_reader_rejects_every_read() {
        let reader = MessageReader::new(&[]);
        assert!(reader.is_empty());
        assert_eq!(
            reader.require_len(1),
            Err(FormatError::TruncatedMessage {
                needed: 1,
                actual: 0
            })
        );
        assert!(reader.read_u8(0).is_err());
    }

    #[test]
    fn word_reader_is_offset_past_header() {
        let mut bytes = vec![0u8; 8 + 32];
        bytes[8 + 16] = b'P';
        let reader = MessageReader::new(&bytes);
        let word = reader.word(1).unwrap();
        assert_eq!(word.len(), 16);
        assert!(!word.is_empty());
        assert_eq!(word.read_u8(0).unwrap(), b'P');
        assert!(reader.word(2).is_err());
    }
}
