//! Peerlink frame header
//!
//! The header is 12 bytes, followed by the payload and a one-byte checksum.

use super::{Error, HEADER_SIZE, MAX_PAYLOAD, MacAddress, MessageKind, Result};

/// Peerlink frame header (12 bytes on the wire)
///
/// # Wire Format
///
/// ```text
/// 0       1                       7               11      12
/// +-------+-----------------------+---------------+-------+------------+----------+
/// | Kind  |   Sender address (6)  | Timestamp (4) |  Len  | Payload(N) | Checksum |
/// +-------+-----------------------+---------------+-------+------------+----------+
/// ```
///
/// The timestamp is little-endian; `Len` is at most 230.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    kind: u8,
    sender: MacAddress,
    timestamp: u32,
    payload_len: u8,
}

impl FrameHeader {
    /// Create a new frame header
    ///
    /// Fails when `payload_len` exceeds [`MAX_PAYLOAD`].
    pub fn new(
        kind: MessageKind,
        sender: MacAddress,
        timestamp: u32,
        payload_len: usize,
    ) -> Result<Self> {
        let len = u8::try_from(payload_len)
            .ok()
            .filter(|len| usize::from(*len) <= MAX_PAYLOAD)
            .ok_or(Error::PayloadTooLarge {
                size: payload_len,
                max: MAX_PAYLOAD,
            })?;

        Ok(Self {
            kind: kind.as_u8(),
            sender,
            timestamp,
            payload_len: len,
        })
    }

    /// Get kind byte
    #[must_use]
    pub const fn kind_byte(&self) -> u8 {
        self.kind
    }

    /// Get message kind
    #[must_use]
    pub const fn kind(&self) -> Option<MessageKind> {
        MessageKind::from_u8(self.kind)
    }

    /// Get sender address
    #[must_use]
    pub const fn sender(&self) -> MacAddress {
        self.sender
    }

    /// Get sender timestamp
    #[must_use]
    pub const fn timestamp(&self) -> u32 {
        self.timestamp
    }

    /// Get payload length
    #[must_use]
    pub const fn payload_len(&self) -> usize {
        self.payload_len as usize
    }

    /// Compute the checksum covering this header and `payload`.
    #[must_use]
    pub fn checksum(&self, payload: &[u8]) -> u8 {
        super::checksum::compute_with_kind_byte(
            self.kind,
            &self.sender,
            self.timestamp.to_le_bytes()[0],
            self.payload_len,
            payload,
        )
    }

    /// Convert to bytes (little-endian)
    #[must_use]
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];

        bytes[0] = self.kind;
        bytes[1..7].copy_from_slice(self.sender.as_bytes());
        bytes[7..11].copy_from_slice(&self.timestamp.to_le_bytes());
        bytes[11] = self.payload_len;

        bytes
    }

    /// Parse from bytes (little-endian)
    ///
    /// Only the layout is checked here; the kind byte is validated after the
    /// checksum so a corrupted frame is reported as a checksum failure.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let head = bytes.get(..HEADER_SIZE).ok_or(Error::Truncated {
            needed: HEADER_SIZE,
            got: bytes.len(),
        })?;

        let header = Self {
            kind: head[0],
            sender: MacAddress::new([head[1], head[2], head[3], head[4], head[5], head[6]]),
            timestamp: u32::from_le_bytes([head[7], head[8], head[9], head[10]]),
            payload_len: head[11],
        };

        if header.payload_len() > MAX_PAYLOAD {
            return Err(Error::PayloadTooLarge {
                size: header.payload_len(),
                max: MAX_PAYLOAD,
            });
        }

        Ok(header)
    }
}
