//! In-process radio adapter that records frames instead of transmitting.
//!
//! Useful for host-side tests and simulations: every accepted frame is kept
//! in order, and individual destinations can be configured to be rejected
//! the way a busy driver would.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::trace;

use super::{Transport, TransportError};
use crate::protocol::{MAX_DATAGRAM_SIZE, MacAddress};

/// A frame accepted by [`MemoryTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentFrame {
    /// Destination hardware address.
    pub destination: MacAddress,
    /// Raw frame bytes.
    pub bytes: Vec<u8>,
}

/// Recording transport.
#[derive(Debug)]
pub struct MemoryTransport {
    local: MacAddress,
    max_datagram: usize,
    inner: Mutex<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    started: bool,
    sent: Vec<SentFrame>,
    attempts: Vec<MacAddress>,
    rejected: HashSet<MacAddress>,
    link_peers: HashSet<MacAddress>,
    refuse_peers: bool,
}

impl MemoryTransport {
    /// Create a transport for a device with hardware address `local`.
    #[must_use]
    pub fn new(local: MacAddress) -> Self {
        Self {
            local,
            max_datagram: MAX_DATAGRAM_SIZE,
            inner: Mutex::new(MemoryState::default()),
        }
    }

    /// Override the datagram ceiling.
    #[must_use]
    pub fn with_max_datagram(mut self, max_datagram: usize) -> Self {
        self.max_datagram = max_datagram;
        self
    }

    /// Reject every transmit to `destination` with [`TransportError::Busy`].
    pub fn reject_to(&self, destination: MacAddress) {
        self.state().rejected.insert(destination);
    }

    /// Stop rejecting transmits to `destination`.
    pub fn accept_to(&self, destination: MacAddress) {
        self.state().rejected.remove(&destination);
    }

    /// Make [`Transport::add_peer`] fail.
    pub fn refuse_peers(&self, refuse: bool) {
        self.state().refuse_peers = refuse;
    }

    /// Frames accepted so far, oldest first.
    #[must_use]
    pub fn sent(&self) -> Vec<SentFrame> {
        self.state().sent.clone()
    }

    /// Drain the accepted frames.
    pub fn take_sent(&self) -> Vec<SentFrame> {
        std::mem::take(&mut self.state().sent)
    }

    /// Destinations of every transmit call, accepted or not.
    #[must_use]
    pub fn attempts(&self) -> Vec<MacAddress> {
        self.state().attempts.clone()
    }

    /// Whether the radio is currently started.
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.state().started
    }

    /// Whether `address` is on the link-layer peer list.
    #[must_use]
    pub fn has_link_peer(&self, address: MacAddress) -> bool {
        self.state().link_peers.contains(&address)
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Transport for MemoryTransport {
    fn start(&self) -> Result<(), TransportError> {
        let mut state = self.state();
        state.started = true;
        state.link_peers.clear();
        Ok(())
    }

    fn stop(&self) {
        self.state().started = false;
    }

    fn local_address(&self) -> MacAddress {
        self.local
    }

    fn max_datagram(&self) -> usize {
        self.max_datagram
    }

    fn add_peer(&self, address: MacAddress) -> Result<(), TransportError> {
        let mut state = self.state();
        if state.refuse_peers {
            return Err(TransportError::Driver("peer list full".to_owned()));
        }
        if !state.link_peers.insert(address) {
            return Err(TransportError::PeerExists(address));
        }
        Ok(())
    }

    fn remove_peer(&self, address: MacAddress) {
        self.state().link_peers.remove(&address);
    }

    fn transmit(&self, destination: MacAddress, frame: &[u8]) -> Result<(), TransportError> {
        let mut state = self.state();
        state.attempts.push(destination);

        if !state.started {
            return Err(TransportError::NotStarted);
        }
        if frame.len() > self.max_datagram {
            return Err(TransportError::FrameTooLarge {
                size: frame.len(),
                max: self.max_datagram,
            });
        }
        if state.rejected.contains(&destination) {
            return Err(TransportError::Busy);
        }

        trace!(%destination, len = frame.len(), "frame recorded");
        state.sent.push(SentFrame {
            destination,
            bytes: frame.to_vec(),
        });
        Ok(())
    }
}
