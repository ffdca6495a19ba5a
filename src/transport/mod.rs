//! Radio transport boundary
//!
//! The messaging layer never touches the radio directly. Outbound frames go
//! through a [`Transport`]; the driver reports inbound frames and delivery
//! outcomes through [`LinkEvents`], usually from its own task or interrupt
//! context.

mod error;
mod memory;

use std::sync::Arc;

use crate::protocol::{MAX_DATAGRAM_SIZE, MacAddress};

pub use error::TransportError;
pub use memory::{MemoryTransport, SentFrame};

/// Outbound half of a radio adapter.
///
/// Implementations must be callable from any thread; the messenger calls
/// them without holding its own lock.
pub trait Transport: Send + Sync {
    /// Bring the radio up (station mode, driver init).
    ///
    /// Called once when the messenger starts.
    fn start(&self) -> Result<(), TransportError> {
        Ok(())
    }

    /// Shut the radio down.
    fn stop(&self) {}

    /// Hardware address of this device.
    fn local_address(&self) -> MacAddress;

    /// Largest datagram the radio accepts, in bytes.
    fn max_datagram(&self) -> usize {
        MAX_DATAGRAM_SIZE
    }

    /// Add `address` to the link-layer peer list.
    fn add_peer(&self, _address: MacAddress) -> Result<(), TransportError> {
        Ok(())
    }

    /// Remove `address` from the link-layer peer list.
    fn remove_peer(&self, _address: MacAddress) {}

    /// Hand a frame to the radio.
    ///
    /// `Ok` means "accepted for transmission"; the delivery outcome arrives
    /// later through [`LinkEvents::on_send_complete`].
    fn transmit(&self, destination: MacAddress, frame: &[u8]) -> Result<(), TransportError>;
}

/// Inbound half of a radio adapter: what the driver calls back into.
///
/// Implementations must tolerate calls from the driver context concurrently
/// with application calls.
pub trait LinkEvents: Send + Sync {
    /// A datagram arrived from `source`.
    fn on_receive(&self, source: MacAddress, frame: &[u8]);

    /// The radio finished a transmission to `destination`.
    fn on_send_complete(&self, destination: MacAddress, delivered: bool);
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn start(&self) -> Result<(), TransportError> {
        (**self).start()
    }

    fn stop(&self) {
        (**self).stop();
    }

    fn local_address(&self) -> MacAddress {
        (**self).local_address()
    }

    fn max_datagram(&self) -> usize {
        (**self).max_datagram()
    }

    fn add_peer(&self, address: MacAddress) -> Result<(), TransportError> {
        (**self).add_peer(address)
    }

    fn remove_peer(&self, address: MacAddress) {
        (**self).remove_peer(address);
    }

    fn transmit(&self, destination: MacAddress, frame: &[u8]) -> Result<(), TransportError> {
        (**self).transmit(destination, frame)
    }
}
