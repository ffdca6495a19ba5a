//! Peerlink error types

use thiserror::Error;

use super::MacAddress;
use crate::transport::TransportError;

/// Peerlink errors
#[derive(Error, Debug)]
pub enum Error {
    /// Payload exceeds the per-frame limit
    #[error("payload too large: {size} bytes (max {max})")]
    PayloadTooLarge {
        /// Payload size
        size: usize,
        /// Maximum allowed
        max: usize,
    },

    /// Encoded frame exceeds the transport's datagram ceiling
    #[error("frame too large for transport: {size} bytes (max {max})")]
    FrameTooLarge {
        /// Frame size
        size: usize,
        /// Transport ceiling
        max: usize,
    },

    /// Buffer ends before the frame does
    #[error("truncated frame: need {needed} bytes, got {got}")]
    Truncated {
        /// Needed size
        needed: usize,
        /// Actual size
        got: usize,
    },

    /// Checksum mismatch
    #[error("checksum mismatch: expected {expected:#04x}, got {found:#04x}")]
    ChecksumMismatch {
        /// Checksum recomputed over the frame
        expected: u8,
        /// Checksum carried by the frame
        found: u8,
    },

    /// Invalid message kind
    #[error("unknown message kind: {kind_byte:#x}")]
    UnknownKind {
        /// Invalid kind byte
        kind_byte: u8,
    },

    /// Peer table is at capacity
    #[error("peer table full (capacity {capacity})")]
    TableFull {
        /// Configured maximum number of peers
        capacity: usize,
    },

    /// Peer is not registered
    #[error("peer {0} not registered")]
    PeerNotFound(MacAddress),

    /// Transport refused the request
    #[error("transport rejected request: {0}")]
    TransportRejected(#[from] TransportError),

    /// Address text could not be parsed
    #[error("invalid hardware address: {0:?}")]
    InvalidAddress(String),

    /// Configuration value out of range
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),

    /// Messenger has been shut down
    #[error("messenger is not running")]
    NotRunning,

    /// JSON payload encoding failed
    #[cfg(feature = "serde")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether this error describes a malformed inbound frame.
    #[must_use]
    pub const fn is_malformed_frame(&self) -> bool {
        matches!(
            self,
            Self::Truncated { .. }
                | Self::ChecksumMismatch { .. }
                | Self::UnknownKind { .. }
                | Self::PayloadTooLarge { .. }
        )
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{MessageKind, decode, encode};

    #[test]
    fn test_every_decode_failure_is_malformed() {
        let frame = encode(MessageKind::Alert, MacAddress::default(), 0, b"fire").unwrap();

        let mut corrupt = frame.clone();
        corrupt[12] ^= 0x01;
        let mut oversized = vec![0u8; 250];
        oversized[11] = 231;
        let mut unknown = frame.clone();
        unknown[0] = 42;
        let last = unknown.len() - 1;
        unknown[last] = unknown[last].wrapping_add(42);

        for bytes in [frame[..5].to_vec(), corrupt, oversized, unknown] {
            let err = decode(bytes.into()).unwrap_err();
            assert!(err.is_malformed_frame(), "{err} should count as malformed");
        }
    }

    #[test]
    fn test_local_errors_are_not_malformed() {
        assert!(!Error::NotRunning.is_malformed_frame());
        assert!(!Error::TableFull { capacity: 5 }.is_malformed_frame());
        assert!(!Error::TransportRejected(TransportError::Busy).is_malformed_frame());
    }
}
