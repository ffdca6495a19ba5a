//! Transport-level error types reported by radio adapters.

use crate::protocol::MacAddress;

/// Errors a radio adapter reports synchronously.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum TransportError {
    /// Driver cannot accept another frame right now.
    #[error("radio driver busy")]
    Busy,
    /// Radio has not been started or was stopped.
    #[error("radio not started")]
    NotStarted,
    /// Destination must be added as a link-layer peer first.
    #[error("peer {0} not added to the link layer")]
    PeerNotAdded(MacAddress),
    /// Peer is already on the link-layer peer list.
    #[error("peer {0} already added to the link layer")]
    PeerExists(MacAddress),
    /// Frame exceeds the radio's datagram ceiling.
    #[error("frame too large: {size} bytes (max {max})")]
    FrameTooLarge {
        /// Size of the attempted frame.
        size: usize,
        /// Maximum datagram size of the radio.
        max: usize,
    },
    /// Any other driver failure.
    #[error("radio driver error: {0}")]
    Driver(String),
}
