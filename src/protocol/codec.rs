//! Peerlink frame codec (encode/decode)
//!
//! Frames are written and parsed field by field, independent of any
//! in-memory struct layout.

use bytes::Bytes;

use super::{
    CHECKSUM_SIZE, Error, FrameHeader, HEADER_SIZE, MIN_FRAME_SIZE, MacAddress, Message,
    MessageKind, Result,
};

/// Encode message fields to a frame
///
/// # Format
///
/// ```text
/// [HEADER (12 bytes)] [PAYLOAD (0..=230 bytes)] [CHECKSUM (1 byte)]
/// ```
///
/// # Errors
///
/// Returns [`Error::PayloadTooLarge`] when `payload` exceeds
/// [`MAX_PAYLOAD`](super::MAX_PAYLOAD); nothing is truncated.
pub fn encode(
    kind: MessageKind,
    sender: MacAddress,
    timestamp: u32,
    payload: &[u8],
) -> Result<Vec<u8>> {
    let header = FrameHeader::new(kind, sender, timestamp, payload.len())?;
    let mut bytes = Vec::with_capacity(MIN_FRAME_SIZE + payload.len());

    bytes.extend_from_slice(&header.to_bytes());
    bytes.extend_from_slice(payload);
    bytes.push(header.checksum(payload));

    Ok(bytes)
}

/// Write an already-validated message.
pub(super) fn write_frame(message: &Message) -> Vec<u8> {
    let payload = message.payload();
    let mut bytes = Vec::with_capacity(message.frame_len());

    bytes.extend_from_slice(&message.header().to_bytes());
    bytes.extend_from_slice(payload);
    bytes.push(message.checksum());

    bytes
}

/// Decode a message from a frame
///
/// The payload is sliced out of `bytes` without copying. Bytes after the
/// checksum are ignored.
///
/// # Errors
///
/// Returns an error if:
/// - Buffer is shorter than the header + checksum, or than the declared payload
/// - Declared payload length exceeds the limit
/// - Checksum doesn't match
/// - Kind byte is unknown (checked only once the checksum passed)
pub fn decode(bytes: Bytes) -> Result<Message> {
    let total_available = bytes.len();

    if total_available < MIN_FRAME_SIZE {
        return Err(Error::Truncated {
            needed: MIN_FRAME_SIZE,
            got: total_available,
        });
    }

    let header = FrameHeader::from_bytes(&bytes[..HEADER_SIZE])?;

    let payload_len = header.payload_len();
    let checksum_offset = HEADER_SIZE + payload_len;
    let total_size = checksum_offset + CHECKSUM_SIZE;

    if total_available < total_size {
        return Err(Error::Truncated {
            needed: total_size,
            got: total_available,
        });
    }

    let payload = bytes.slice(HEADER_SIZE..checksum_offset);
    let stored_checksum = bytes[checksum_offset];
    let calculated_checksum = header.checksum(&payload);

    if stored_checksum != calculated_checksum {
        return Err(Error::ChecksumMismatch {
            expected: calculated_checksum,
            found: stored_checksum,
        });
    }

    let kind = MessageKind::try_from(header.kind_byte())?;

    Ok(Message::from_parts(header, kind, payload, stored_checksum))
}
