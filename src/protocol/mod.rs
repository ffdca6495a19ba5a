//! Peerlink wire protocol
//!
//! This module provides the frame layout, message kinds, checksum, and codec.

mod address;
pub mod checksum;
mod codec;
mod error;
mod header;
mod message;
mod types;

pub use address::MacAddress;
pub use codec::{decode, encode};
pub use error::{Error, Result};
pub use header::FrameHeader;
pub use message::Message;
pub use types::MessageKind;

/// Maximum payload size in bytes
pub const MAX_PAYLOAD: usize = 230;

/// Largest datagram the reference radio accepts
pub const MAX_DATAGRAM_SIZE: usize = 250;

/// Header size in bytes (kind + address + timestamp + length)
pub const HEADER_SIZE: usize = 12;

/// Checksum size in bytes
pub const CHECKSUM_SIZE: usize = 1;

/// Minimum frame size (header + checksum, empty payload)
pub const MIN_FRAME_SIZE: usize = HEADER_SIZE + CHECKSUM_SIZE;

/// Largest frame the codec produces
pub const MAX_FRAME_SIZE: usize = MIN_FRAME_SIZE + MAX_PAYLOAD;
