//! Nested hardware packets carried inside Data words.
//!
//! The outer envelope tags every readout word as Data; the 8-byte packet it
//! carries encodes its own type in the low two bits of byte 0, a direction
//! flag in byte 7, and a trailing parity bit covering all 64 bits.

pub mod classify;
pub mod parity;

pub use classify::{packet_type, reclassify};
pub use parity::{has_valid_parity, parity64};

pub const PACKET_TYPE_OFFSET: usize = 0;
pub const PACKET_TYPE_MASK: u8 = 0b11;
pub const DIRECTION_OFFSET: usize = 7;
pub const DOWNSTREAM_MASK: u8 = 0x40;

/// Whether the packet travelled downstream (towards the detector).
pub fn is_downstream(packet: &[u8; 8]) -> bool {
    packet[DIRECTION_OFFSET] & DOWNSTREAM_MASK != 0
}

#[cfg(test)]
mod tests {
    use super::is_downstream;

    #[test]
    fn direction_flag_is_bit_six_of_last_byte() {
        assert!(is_downstream(&[0, 0, 0, 0, 0, 0, 0, 0x40]));
        assert!(is_downstream(&[0, 0, 0, 0, 0, 0, 0, 0xff]));
        assert!(!is_downstream(&[0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xbf]));
    }
}
