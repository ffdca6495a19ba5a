//! Additive frame checksum
//!
//! The checksum is the wrapping 8-bit sum of the kind byte, the six sender
//! address bytes, the low byte of the timestamp, the length byte, and every
//! payload byte. It detects truncation and single-byte corruption on a lossy
//! link; it is not a MAC and gives no protection against tampering.
//!
//! Known limitations:
//! - the upper three timestamp bytes are not covered, so corruption there
//!   passes validation;
//! - any reordering of covered bytes (for example two swapped payload bytes)
//!   preserves the sum;
//! - two corruptions that cancel modulo 256 pass validation.

use super::{CHECKSUM_SIZE, HEADER_SIZE, MacAddress, MessageKind};

/// Offset of the timestamp low byte within a frame
const TIMESTAMP_LOW_OFFSET: usize = 7;
/// Offset of the payload length byte within a frame
const LENGTH_OFFSET: usize = 11;

/// Compute the checksum over already-split frame fields.
#[must_use]
pub fn compute(
    kind: MessageKind,
    sender: &MacAddress,
    timestamp_low_byte: u8,
    length: u8,
    payload: &[u8],
) -> u8 {
    compute_with_kind_byte(kind.as_u8(), sender, timestamp_low_byte, length, payload)
}

/// Same as [`compute`] with the kind byte taken raw.
pub(crate) fn compute_with_kind_byte(
    kind_byte: u8,
    sender: &MacAddress,
    timestamp_low_byte: u8,
    length: u8,
    payload: &[u8],
) -> u8 {
    let header = sum_bytes(kind_byte, sender.as_bytes())
        .wrapping_add(timestamp_low_byte)
        .wrapping_add(length);
    sum_bytes(header, payload)
}

/// Compute the checksum over a raw frame prefix (`header` + payload).
///
/// `frame` must hold at least the header and the declared payload; the kind
/// byte is summed raw so that unknown kinds are still checked.
#[must_use]
fn compute_raw(frame: &[u8], payload_len: usize) -> u8 {
    let header = sum_bytes(0, &frame[..=TIMESTAMP_LOW_OFFSET]).wrapping_add(frame[LENGTH_OFFSET]);
    sum_bytes(header, &frame[HEADER_SIZE..HEADER_SIZE + payload_len])
}

/// Recompute and compare the checksum of a complete frame.
///
/// Returns `false` for buffers too short to hold the declared frame.
#[must_use]
pub fn verify(frame: &[u8]) -> bool {
    if frame.len() < HEADER_SIZE + CHECKSUM_SIZE {
        return false;
    }
    let payload_len = usize::from(frame[LENGTH_OFFSET]);
    let checksum_offset = HEADER_SIZE + payload_len;
    match frame.get(checksum_offset) {
        Some(stored) => compute_raw(frame, payload_len) == *stored,
        None => false,
    }
}

fn sum_bytes(seed: u8, bytes: &[u8]) -> u8 {
    bytes.iter().fold(seed, |sum, byte| sum.wrapping_add(*byte))
}

#[cfg(test)]
mod tests {
    use super::*;

    const NODE: MacAddress = MacAddress::new([0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF]);

    #[test]
    fn test_compute_wraps_modulo_256() {
        // 0 + (0xAA+0xBB+0xCC+0xDD+0xEE+0xFF) + 0x10 + 2 + 0x80 + 0x80
        let sum = compute(MessageKind::SensorData, &NODE, 0x10, 2, &[0x80, 0x80]);
        let expected = (0xAAu32 + 0xBB + 0xCC + 0xDD + 0xEE + 0xFF + 0x10 + 2 + 0x100) % 256;
        assert_eq!(u32::from(sum), expected);
    }

    #[test]
    fn test_empty_payload() {
        let sum = compute(MessageKind::Custom, &MacAddress::default(), 0, 0, &[]);
        assert_eq!(sum, 99);
    }

    #[test]
    fn test_verify_matches_compute() {
        let mut frame = vec![MessageKind::Alert.as_u8()];
        frame.extend_from_slice(NODE.as_bytes());
        frame.extend_from_slice(&0x0102_0304u32.to_le_bytes());
        frame.push(3);
        frame.extend_from_slice(b"hot");
        frame.push(compute(MessageKind::Alert, &NODE, 0x04, 3, b"hot"));

        assert!(verify(&frame));

        let last = frame.len() - 1;
        frame[last] = frame[last].wrapping_add(1);
        assert!(!verify(&frame));
    }

    #[test]
    fn test_verify_rejects_short_buffers() {
        assert!(!verify(&[]));
        assert!(!verify(&[0u8; 12]));

        let mut frame = vec![0u8; 13];
        frame[LENGTH_OFFSET] = 5;
        assert!(!verify(&frame));
    }

    #[test]
    fn test_swapped_payload_bytes_are_not_detected() {
        let a = compute(MessageKind::Status, &NODE, 0, 2, b"ab");
        let b = compute(MessageKind::Status, &NODE, 0, 2, b"ba");
        assert_eq!(a, b);
    }
}
