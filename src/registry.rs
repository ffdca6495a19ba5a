//! Bounded table of known peers
//!
//! Peers are only ever added by explicit registration. Liveness is soft: the
//! sweep clears `active` but keeps the entry and its counters, so a peer that
//! speaks again is recognized without re-registering.

use std::fmt;

use tracing::debug;

use crate::protocol::{Error, MacAddress, Result};

/// Maximum display name length in bytes
pub const MAX_NAME_LEN: usize = 31;

/// Information about a registered remote device
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Peer {
    address: MacAddress,
    name: Option<String>,
    active: bool,
    last_seen: u32,
    messages_sent: u32,
    messages_received: u32,
}

impl Peer {
    fn new(address: MacAddress, name: &str, now: u32) -> Self {
        Self {
            address,
            name: truncate_name(name),
            active: true,
            last_seen: now,
            messages_sent: 0,
            messages_received: 0,
        }
    }

    /// Hardware address
    #[must_use]
    pub const fn address(&self) -> MacAddress {
        self.address
    }

    /// Display name, if one was given
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Whether the peer passed the last liveness sweep
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Timestamp (ms) of the last validated message from this peer
    #[must_use]
    pub const fn last_seen(&self) -> u32 {
        self.last_seen
    }

    /// Sends to this peer confirmed by the link layer
    #[must_use]
    pub const fn messages_sent(&self) -> u32 {
        self.messages_sent
    }

    /// Validated messages received from this peer
    #[must_use]
    pub const fn messages_received(&self) -> u32 {
        self.messages_received
    }

    /// Milliseconds since the peer was last heard from
    #[must_use]
    pub const fn idle_ms(&self, now: u32) -> u32 {
        now.wrapping_sub(self.last_seen)
    }
}

impl fmt::Display for Peer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} (sent:{}, recv:{}, last seen:{}{})",
            self.name().unwrap_or("<unnamed>"),
            self.address,
            self.messages_sent,
            self.messages_received,
            self.last_seen,
            if self.active { "" } else { ", inactive" }
        )
    }
}

/// Outcome of a successful registration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// A new entry was created
    Added,
    /// The address was already registered; nothing changed
    AlreadyRegistered,
}

/// Fixed-capacity peer table keyed by hardware address
///
/// Entries keep registration order.
#[derive(Debug, Clone)]
pub struct PeerRegistry {
    peers: Vec<Peer>,
    capacity: usize,
}

impl PeerRegistry {
    /// Create an empty table holding at most `capacity` peers
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            peers: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Maximum number of peers
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of registered peers
    #[must_use]
    pub fn len(&self) -> usize {
        self.peers.len()
    }

    /// Check if table is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    /// Check if no further peer can be registered
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.peers.len() >= self.capacity
    }

    /// Check if `address` is registered
    #[must_use]
    pub fn contains(&self, address: &MacAddress) -> bool {
        self.position(address).is_some()
    }

    /// Get peer by address
    #[must_use]
    pub fn get(&self, address: &MacAddress) -> Option<&Peer> {
        self.peers.iter().find(|peer| peer.address == *address)
    }

    /// Register a peer
    ///
    /// Registering a known address is a successful no-op (the stored name is
    /// kept). A new entry starts active with `last_seen = now`.
    pub fn register(&mut self, address: MacAddress, name: &str, now: u32) -> Result<Registration> {
        if self.contains(&address) {
            return Ok(Registration::AlreadyRegistered);
        }
        if self.is_full() {
            return Err(Error::TableFull {
                capacity: self.capacity,
            });
        }

        self.peers.push(Peer::new(address, name, now));
        Ok(Registration::Added)
    }

    /// Remove a peer, returning its final state
    pub fn unregister(&mut self, address: &MacAddress) -> Result<Peer> {
        let index = self
            .position(address)
            .ok_or(Error::PeerNotFound(*address))?;
        Ok(self.peers.remove(index))
    }

    /// Record a validated inbound message from `address`
    ///
    /// Revives an inactive peer. Returns `false` for unregistered addresses,
    /// which are not tracked.
    pub fn touch(&mut self, address: &MacAddress, now: u32) -> bool {
        let Some(peer) = self.get_mut(address) else {
            return false;
        };

        if !peer.active {
            debug!(%address, "peer active again");
        }
        peer.last_seen = now;
        peer.messages_received = peer.messages_received.saturating_add(1);
        peer.active = true;
        true
    }

    /// Record a link-layer confirmed send to `address`
    pub fn record_sent(&mut self, address: &MacAddress) -> bool {
        match self.get_mut(address) {
            Some(peer) => {
                peer.messages_sent = peer.messages_sent.saturating_add(1);
                true
            }
            None => false,
        }
    }

    /// Mark peers silent for more than `timeout_ms` as inactive
    ///
    /// Returns the number of peers that went inactive during this sweep.
    pub fn sweep(&mut self, now: u32, timeout_ms: u32) -> usize {
        let mut expired = 0;
        for peer in &mut self.peers {
            if peer.active && peer.idle_ms(now) > timeout_ms {
                peer.active = false;
                expired += 1;
                debug!(address = %peer.address, name = peer.name(), "peer marked inactive");
            }
        }
        expired
    }

    /// Iterate over active peers
    pub fn list_active(&self) -> impl Iterator<Item = &Peer> {
        self.peers.iter().filter(|peer| peer.active)
    }

    /// Iterate over all peers in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Peer> {
        self.peers.iter()
    }

    /// Zero every per-peer counter
    pub fn reset_counters(&mut self) {
        for peer in &mut self.peers {
            peer.messages_sent = 0;
            peer.messages_received = 0;
        }
    }

    fn position(&self, address: &MacAddress) -> Option<usize> {
        self.peers.iter().position(|peer| peer.address == *address)
    }

    fn get_mut(&mut self, address: &MacAddress) -> Option<&mut Peer> {
        self.peers.iter_mut().find(|peer| peer.address == *address)
    }
}

fn truncate_name(name: &str) -> Option<String> {
    if name.is_empty() {
        return None;
    }
    let mut end = name.len().min(MAX_NAME_LEN);
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    Some(name[..end].to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(last: u8) -> MacAddress {
        MacAddress::new([0xAA, 0xBB, 0xCC, 0xDD, 0xEE, last])
    }

    #[test]
    fn test_register_is_idempotent() {
        let mut registry = PeerRegistry::new(5);

        assert_eq!(registry.register(addr(1), "A", 0).unwrap(), Registration::Added);
        assert_eq!(
            registry.register(addr(1), "B", 10).unwrap(),
            Registration::AlreadyRegistered
        );
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(&addr(1)).unwrap().name(), Some("A"));
    }

    #[test]
    fn test_register_fails_when_full() {
        let mut registry = PeerRegistry::new(2);
        registry.register(addr(1), "", 0).unwrap();
        registry.register(addr(2), "", 0).unwrap();

        assert!(matches!(
            registry.register(addr(3), "", 0),
            Err(Error::TableFull { capacity: 2 })
        ));
        // known peers still register fine on a full table
        assert_eq!(registry.register(addr(2), "", 0).unwrap(), Registration::AlreadyRegistered);
    }

    #[test]
    fn test_new_peer_state() {
        let mut registry = PeerRegistry::new(1);
        registry.register(addr(1), "Node2", 500).unwrap();
        let peer = registry.get(&addr(1)).unwrap();

        assert!(peer.is_active());
        assert_eq!(peer.last_seen(), 500);
        assert_eq!(peer.messages_sent(), 0);
        assert_eq!(peer.messages_received(), 0);
    }

    #[test]
    fn test_unregister() {
        let mut registry = PeerRegistry::new(3);
        registry.register(addr(1), "a", 0).unwrap();
        registry.register(addr(2), "b", 0).unwrap();
        registry.register(addr(3), "c", 0).unwrap();

        let removed = registry.unregister(&addr(2)).unwrap();
        assert_eq!(removed.name(), Some("b"));
        assert!(matches!(
            registry.unregister(&addr(2)),
            Err(Error::PeerNotFound(a)) if a == addr(2)
        ));

        let order: Vec<_> = registry.iter().map(Peer::address).collect();
        assert_eq!(order, vec![addr(1), addr(3)]);
        assert!(!registry.touch(&addr(2), 10));
    }

    #[test]
    fn test_touch_updates_registered_only() {
        let mut registry = PeerRegistry::new(2);
        registry.register(addr(1), "", 0).unwrap();

        assert!(registry.touch(&addr(1), 250));
        assert!(!registry.touch(&addr(9), 250));
        assert_eq!(registry.len(), 1);

        let peer = registry.get(&addr(1)).unwrap();
        assert_eq!(peer.last_seen(), 250);
        assert_eq!(peer.messages_received(), 1);
    }

    #[test]
    fn test_sweep_and_revive() {
        let timeout = 30_000;
        let t0 = 1_000;
        let mut registry = PeerRegistry::new(2);
        registry.register(addr(1), "", t0).unwrap();

        assert_eq!(registry.sweep(t0 + timeout, timeout), 0);
        assert!(registry.get(&addr(1)).unwrap().is_active());

        assert_eq!(registry.sweep(t0 + timeout + 1, timeout), 1);
        assert!(!registry.get(&addr(1)).unwrap().is_active());
        assert_eq!(registry.list_active().count(), 0);
        assert_eq!(registry.len(), 1);

        // already inactive peers are not counted again
        assert_eq!(registry.sweep(t0 + timeout + 2, timeout), 0);

        assert!(registry.touch(&addr(1), t0 + timeout + 5));
        assert!(registry.get(&addr(1)).unwrap().is_active());
        assert_eq!(registry.list_active().count(), 1);
    }

    #[test]
    fn test_sweep_handles_clock_wrap() {
        let mut registry = PeerRegistry::new(1);
        registry.register(addr(1), "", u32::MAX - 10).unwrap();

        assert_eq!(registry.sweep(5, 100), 0);
        assert_eq!(registry.sweep(200, 100), 1);
    }

    #[test]
    fn test_counters_and_reset() {
        let mut registry = PeerRegistry::new(1);
        registry.register(addr(1), "", 0).unwrap();
        registry.touch(&addr(1), 1);
        assert!(registry.record_sent(&addr(1)));
        assert!(!registry.record_sent(&addr(2)));

        registry.reset_counters();
        let peer = registry.get(&addr(1)).unwrap();
        assert_eq!((peer.messages_sent(), peer.messages_received()), (0, 0));
    }

    #[test]
    fn test_name_truncation() {
        let mut registry = PeerRegistry::new(2);
        let long = "x".repeat(40);
        registry.register(addr(1), &long, 0).unwrap();
        assert_eq!(registry.get(&addr(1)).unwrap().name().map(str::len), Some(MAX_NAME_LEN));

        // 30 ASCII bytes + a 2-byte char straddling the limit
        let multibyte = format!("{}é", "y".repeat(30));
        registry.register(addr(2), &multibyte, 0).unwrap();
        assert_eq!(registry.get(&addr(2)).unwrap().name().map(str::len), Some(30));
    }

    #[test]
    fn test_display() {
        let mut registry = PeerRegistry::new(1);
        registry.register(addr(0xFF), "Node2", 7).unwrap();
        let line = registry.get(&addr(0xFF)).unwrap().to_string();
        assert_eq!(line, "Node2 - AA:BB:CC:DD:EE:FF (sent:0, recv:0, last seen:7)");
    }
}
