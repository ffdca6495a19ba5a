//! Peerlink message implementation

use bytes::Bytes;

use super::{FrameHeader, MIN_FRAME_SIZE, MacAddress, MessageKind, Result};

/// A single validated datagram.
///
/// A `Message` always satisfies the frame invariants: the payload fits in
/// [`MAX_PAYLOAD`](super::MAX_PAYLOAD) and the checksum matches its fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    header: FrameHeader,
    kind: MessageKind,
    payload: Bytes,
    checksum: u8,
}

impl Message {
    /// Create a new message
    ///
    /// Fails with [`Error::PayloadTooLarge`](super::Error::PayloadTooLarge)
    /// rather than truncating.
    pub fn new(
        kind: MessageKind,
        sender: MacAddress,
        timestamp: u32,
        payload: impl Into<Bytes>,
    ) -> Result<Self> {
        let payload = payload.into();
        let header = FrameHeader::new(kind, sender, timestamp, payload.len())?;
        let checksum = header.checksum(&payload);

        Ok(Self {
            header,
            kind,
            payload,
            checksum,
        })
    }

    /// Assemble a message from parts the codec has already validated.
    pub(super) fn from_parts(
        header: FrameHeader,
        kind: MessageKind,
        payload: Bytes,
        checksum: u8,
    ) -> Self {
        Self {
            header,
            kind,
            payload,
            checksum,
        }
    }

    /// Get message kind
    #[must_use]
    pub const fn kind(&self) -> MessageKind {
        self.kind
    }

    /// Get sender address carried in the frame
    #[must_use]
    pub const fn sender(&self) -> MacAddress {
        self.header.sender()
    }

    /// Get sender-local timestamp
    #[must_use]
    pub const fn timestamp(&self) -> u32 {
        self.header.timestamp()
    }

    /// Get payload
    #[must_use]
    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// Payload as UTF-8 text, if it is valid UTF-8
    #[must_use]
    pub fn payload_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.payload).ok()
    }

    /// Get checksum
    #[must_use]
    pub const fn checksum(&self) -> u8 {
        self.checksum
    }

    /// Get header
    #[must_use]
    pub const fn header(&self) -> &FrameHeader {
        &self.header
    }

    /// Encoded size in bytes
    #[must_use]
    pub fn frame_len(&self) -> usize {
        MIN_FRAME_SIZE + self.payload.len()
    }

    /// Encode message to bytes
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        super::codec::write_frame(self)
    }

    /// Decode message from bytes
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        super::decode(Bytes::copy_from_slice(bytes))
    }

    /// Parse the payload as JSON
    #[cfg(feature = "serde")]
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.payload)?)
    }
}
