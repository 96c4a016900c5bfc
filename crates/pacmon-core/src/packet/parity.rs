/// XOR of all 64 bits of the packet, read as a big-endian integer.
pub fn parity64(packet: &[u8; 8]) -> u8 {
    let mut x = u64::from_be_bytes(*packet);
    x ^= x >> 32;
    x ^= x >> 16;
    x ^= x >> 8;
    x ^= x >> 4;
    x ^= x >> 2;
    x ^= x >> 1;
    (x & 1) as u8
}

/// True when the packet holds an even number of set bits.
///
/// # Examples
/// ```
/// use pacmon_core::has_valid_parity;
///
/// assert!(has_valid_parity(&[0, 0, 0, 0, 0, 0, 0, 0]));
/// assert!(!has_valid_parity(&[1, 0, 0, 0, 0, 0, 0, 0]));
/// ```
pub fn has_valid_parity(packet: &[u8; 8]) -> bool {
    parity64(packet) == 0
}

#[cfg(test)]
mod tests {
    use super::{has_valid_parity, parity64};

    #[test]
    fn even_bit_count_is_valid() {
        assert!(has_valid_parity(&[0x03, 0, 0, 0, 0, 0, 0, 0]));
        assert!(has_valid_parity(&[0x80, 0, 0, 0, 0, 0, 0, 0x01]));
        assert!(has_valid_parity(&[0xff; 8]));
    }

    #[test]
    fn odd_bit_count_is_invalid() {
        assert!(!has_valid_parity(&[0, 0, 0, 0, 0, 0, 0, 0x40]));
        assert!(!has_valid_parity(&[0x07, 0, 0, 0, 0, 0, 0, 0]));
    }

    #[test]
    fn flipping_any_bit_flips_validity() {
        let base = [0x12, 0x23, 0x34, 0x45, 0x54, 0x43, 0x32, 0x21];
        let valid = has_valid_parity(&base);
        for byte in 0..8 {
            for bit in 0..8 {
                let mut flipped = base;
                flipped[byte] ^= 1 << bit;
                assert_ne!(has_valid_parity(&flipped), valid, "byte {byte} bit {bit}");
            }
        }
    }

    #[test]
    fn matches_population_count() {
        let packets = [
            [0xde, 0xad, 0xbe, 0xef, 0x00, 0x11, 0x22, 0x33],
            [0x01, 0x02, 0x04, 0x08, 0x10, 0x20, 0x40, 0x80],
            [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01],
        ];
        for packet in packets {
            let ones = u64::from_be_bytes(packet).count_ones();
            assert_eq!(u32::from(parity64(&packet)), ones % 2);
        }
    }
}
