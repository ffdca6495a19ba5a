//! Peerlink - connectionless peer-to-peer messaging for low-power radio nodes
//!
//! Devices exchange small typed datagrams (at most 250 bytes on the air)
//! addressed by 6-byte hardware addresses. This crate provides the wire
//! codec, a bounded peer table with liveness tracking, a transport
//! abstraction over the radio driver, and a [`Messenger`] tying them
//! together.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use peerlink::{MacAddress, Message, MessageKind, Messenger};
//! use peerlink::transport::MemoryTransport;
//!
//! let local: MacAddress = "24:6F:28:00:00:01".parse()?;
//! let node2: MacAddress = "AA:BB:CC:DD:EE:FF".parse()?;
//!
//! let messenger = Messenger::builder(MemoryTransport::new(local))
//!     .on_message(|source: MacAddress, message: &Message| {
//!         println!("{source}: {} {:?}", message.kind(), message.payload_str());
//!     })
//!     .start()?;
//!
//! messenger.register(node2, "Node2")?;
//! messenger.send(node2, MessageKind::SensorData, br#"{"t":21.5}"#)?;
//! # Ok::<(), peerlink::Error>(())
//! ```
//!
//! # Frame Layout
//!
//! | Offset | Size | Field     |
//! |--------|------|-----------|
//! | 0      | 1    | kind      |
//! | 1      | 6    | sender    |
//! | 7      | 4    | timestamp (little-endian) |
//! | 11     | 1    | length N  |
//! | 12     | N    | payload   |
//! | 12+N   | 1    | checksum  |
//!
//! The checksum is an additive 8-bit sum and only detects accidental
//! corruption; see [`protocol::checksum`].

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod clock;
pub mod messenger;
pub mod protocol;
pub mod registry;
pub mod transport;

pub use clock::{Clock, ManualClock, SystemClock};
pub use messenger::{BroadcastSummary, MessageHandler, Messenger, MessengerConfig, Stats};
pub use protocol::{
    Error, MAX_DATAGRAM_SIZE, MAX_PAYLOAD, MacAddress, Message, MessageKind, Result,
};
pub use registry::{Peer, PeerRegistry, Registration};
pub use transport::{LinkEvents, Transport, TransportError};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
