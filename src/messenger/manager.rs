//! The [`Messenger`]: one per device, shared between the application loop
//! and the radio driver's callback context.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::time::Duration;

use bytes::Bytes;
use tracing::{debug, info, instrument, trace, warn};

use super::config::MessengerConfig;
use super::handler::{MessageHandler, SendHandler};
use super::stats::{Counters, Stats};
use crate::clock::{Clock, SystemClock, duration_to_ms};
use crate::protocol::{Error, MacAddress, MessageKind, Result, decode, encode};
use crate::registry::{Peer, PeerRegistry, Registration};
use crate::transport::{LinkEvents, Transport};

/// Registry and counters; always mutated together under one lock.
#[derive(Debug)]
struct State {
    registry: PeerRegistry,
    counters: Counters,
}

#[derive(Default)]
struct Handlers {
    message: Option<Arc<dyn MessageHandler>>,
    send: Option<Arc<dyn SendHandler>>,
}

/// Result of a [`Messenger::broadcast`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastSummary {
    /// Active peers the frame was offered to.
    pub attempted: usize,
    /// Frames the transport accepted.
    pub submitted: usize,
    /// Peers whose frame the transport rejected.
    pub rejected: Vec<MacAddress>,
}

impl BroadcastSummary {
    /// Whether every active peer's frame was accepted.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Builder that binds handlers and starts a [`Messenger`].
pub struct MessengerBuilder<T: Transport> {
    transport: T,
    config: MessengerConfig,
    clock: Box<dyn Clock>,
    handlers: Handlers,
}

impl<T: Transport> MessengerBuilder<T> {
    /// Use `config` instead of the defaults.
    #[must_use]
    pub fn config(mut self, config: MessengerConfig) -> Self {
        self.config = config;
        self
    }

    /// Use `clock` for timestamps and liveness.
    #[must_use]
    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Bind the inbound message handler.
    #[must_use]
    pub fn on_message(mut self, handler: impl MessageHandler + 'static) -> Self {
        self.handlers.message = Some(Arc::new(handler));
        self
    }

    /// Bind the send-completion handler.
    #[must_use]
    pub fn on_send_complete(mut self, handler: impl SendHandler + 'static) -> Self {
        self.handlers.send = Some(Arc::new(handler));
        self
    }

    /// Validate the configuration, bring the radio up, and start.
    #[instrument(level = "info", skip_all)]
    pub fn start(self) -> Result<Messenger<T>> {
        self.config.validate()?;
        self.transport.start()?;

        let local = self.transport.local_address();
        info!(
            %local,
            max_peers = self.config.max_peers,
            liveness_timeout_ms = duration_to_ms(self.config.liveness_timeout),
            "messenger started"
        );

        Ok(Messenger {
            state: Mutex::new(State {
                registry: PeerRegistry::new(self.config.max_peers),
                counters: Counters::default(),
            }),
            handlers: RwLock::new(self.handlers),
            running: AtomicBool::new(true),
            transport: self.transport,
            clock: self.clock,
            config: self.config,
            local,
        })
    }
}

impl<T: Transport + fmt::Debug> fmt::Debug for MessengerBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessengerBuilder")
            .field("transport", &self.transport)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Peer-to-peer messaging manager.
///
/// Share it as `Arc<Messenger<T>>` between the application loop and the
/// radio driver; the driver reports events through [`LinkEvents`]. Internal
/// state sits behind a single short-held lock that is never held across a
/// transport call or a handler invocation.
pub struct Messenger<T: Transport> {
    transport: T,
    clock: Box<dyn Clock>,
    config: MessengerConfig,
    local: MacAddress,
    state: Mutex<State>,
    handlers: RwLock<Handlers>,
    running: AtomicBool,
}

impl<T: Transport> Messenger<T> {
    /// Start building a messenger over `transport`.
    pub fn builder(transport: T) -> MessengerBuilder<T> {
        MessengerBuilder {
            transport,
            config: MessengerConfig::default(),
            clock: Box::new(SystemClock::new()),
            handlers: Handlers::default(),
        }
    }

    /// Start with default configuration and no handlers.
    pub fn start(transport: T) -> Result<Self> {
        Self::builder(transport).start()
    }

    /// Hardware address of this device
    #[must_use]
    pub const fn local_address(&self) -> MacAddress {
        self.local
    }

    /// Active configuration
    #[must_use]
    pub const fn config(&self) -> &MessengerConfig {
        &self.config
    }

    /// Underlying transport
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Whether [`shutdown`](Self::shutdown) has not been called yet
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Replace the inbound message handler.
    pub fn set_message_handler(&self, handler: impl MessageHandler + 'static) {
        self.handlers_mut().message = Some(Arc::new(handler));
    }

    /// Replace the send-completion handler.
    pub fn set_send_handler(&self, handler: impl SendHandler + 'static) {
        self.handlers_mut().send = Some(Arc::new(handler));
    }

    /// Remove both handlers.
    pub fn clear_handlers(&self) {
        *self.handlers_mut() = Handlers::default();
    }

    // ---- peers ----

    /// Register a peer for liveness tracking and broadcast.
    ///
    /// Idempotent: a known address returns [`Registration::AlreadyRegistered`].
    pub fn register(&self, address: MacAddress, name: &str) -> Result<Registration> {
        {
            let state = self.state();
            if state.registry.contains(&address) {
                debug!(%address, "peer already registered");
                return Ok(Registration::AlreadyRegistered);
            }
            if state.registry.is_full() {
                warn!(%address, capacity = state.registry.capacity(), "peer table full");
                return Err(Error::TableFull {
                    capacity: state.registry.capacity(),
                });
            }
        }

        if let Err(err) = self.transport.add_peer(address) {
            // a concurrent register of the same address got there first
            if self.state().registry.contains(&address) {
                debug!(%address, "peer registered concurrently");
                return Ok(Registration::AlreadyRegistered);
            }
            warn!(%address, error = %err, "radio refused peer");
            return Err(err.into());
        }

        let now = self.clock.now_ms();
        let outcome = self.state().registry.register(address, name, now);
        match &outcome {
            Ok(Registration::Added) => info!(%address, name, "peer added"),
            Ok(Registration::AlreadyRegistered) => {}
            // another caller filled the last slot meanwhile
            Err(_) => self.transport.remove_peer(address),
        }
        outcome
    }

    /// Forget a peer; later traffic from it is no longer tracked.
    pub fn unregister(&self, address: MacAddress) -> Result<Peer> {
        let peer = self.state().registry.unregister(&address)?;
        self.transport.remove_peer(address);
        info!(%address, name = peer.name(), "peer removed");
        Ok(peer)
    }

    /// Check if `address` is registered
    #[must_use]
    pub fn is_registered(&self, address: MacAddress) -> bool {
        self.state().registry.contains(&address)
    }

    /// Snapshot of one peer
    #[must_use]
    pub fn peer(&self, address: MacAddress) -> Option<Peer> {
        self.state().registry.get(&address).cloned()
    }

    /// Snapshot of all peers in registration order
    #[must_use]
    pub fn peers(&self) -> Vec<Peer> {
        self.state().registry.iter().cloned().collect()
    }

    /// Snapshot of the active peers
    #[must_use]
    pub fn active_peers(&self) -> Vec<Peer> {
        self.state().registry.list_active().cloned().collect()
    }

    /// Number of registered peers
    #[must_use]
    pub fn peer_count(&self) -> usize {
        self.state().registry.len()
    }

    /// Dump the peer table at debug level.
    pub fn log_peers(&self) {
        let peers = self.peers();
        debug!(count = peers.len(), "registered peers");
        for (i, peer) in peers.iter().enumerate() {
            debug!("{}. {peer}", i + 1);
        }
    }

    // ---- sending ----

    /// Send one message to `destination`.
    ///
    /// Returns once the transport accepted the frame; the delivery outcome
    /// arrives later through the send-completion handler. Registration is
    /// not required.
    #[instrument(level = "debug", skip_all, fields(%destination, %kind, len = payload.len()))]
    pub fn send(&self, destination: MacAddress, kind: MessageKind, payload: &[u8]) -> Result<()> {
        let frame = self.build_frame(kind, payload)?;
        self.submit(destination, kind, &frame)
    }

    /// Send one message to every active peer.
    ///
    /// A rejection for one peer does not stop delivery to the others; it is
    /// reported in the summary and counted in [`Stats::failed`].
    #[instrument(level = "debug", skip_all, fields(%kind, len = payload.len()))]
    pub fn broadcast(&self, kind: MessageKind, payload: &[u8]) -> Result<BroadcastSummary> {
        let frame = self.build_frame(kind, payload)?;
        let targets: Vec<MacAddress> = self
            .state()
            .registry
            .list_active()
            .map(Peer::address)
            .collect();

        let mut summary = BroadcastSummary {
            attempted: targets.len(),
            ..BroadcastSummary::default()
        };
        for destination in targets {
            match self.submit(destination, kind, &frame) {
                Ok(()) => summary.submitted += 1,
                Err(_) => summary.rejected.push(destination),
            }
        }

        debug!(
            attempted = summary.attempted,
            submitted = summary.submitted,
            "broadcast submitted"
        );
        Ok(summary)
    }

    /// Send a JSON sensor reading.
    pub fn send_sensor_data(&self, destination: MacAddress, json: &str) -> Result<()> {
        self.send(destination, MessageKind::SensorData, json.as_bytes())
    }

    /// Send an actuator command.
    pub fn send_actuator_command(&self, destination: MacAddress, command: &str) -> Result<()> {
        self.send(destination, MessageKind::ActuatorCommand, command.as_bytes())
    }

    /// Send an alert.
    pub fn send_alert(&self, destination: MacAddress, alert: &str) -> Result<()> {
        self.send(destination, MessageKind::Alert, alert.as_bytes())
    }

    /// Send an application-level acknowledgment.
    pub fn send_ack(&self, destination: MacAddress, payload: &str) -> Result<()> {
        self.send(destination, MessageKind::Ack, payload.as_bytes())
    }

    /// Serialize `value` as JSON and send it.
    #[cfg(feature = "serde")]
    pub fn send_json<V: serde::Serialize + ?Sized>(
        &self,
        destination: MacAddress,
        kind: MessageKind,
        value: &V,
    ) -> Result<()> {
        let payload = serde_json::to_vec(value)?;
        self.send(destination, kind, &payload)
    }

    /// Send a status report.
    #[cfg(feature = "serde")]
    pub fn send_status(
        &self,
        destination: MacAddress,
        report: &super::StatusReport,
    ) -> Result<()> {
        self.send_json(destination, MessageKind::Status, report)
    }

    fn build_frame(&self, kind: MessageKind, payload: &[u8]) -> Result<Vec<u8>> {
        if !self.is_running() {
            return Err(Error::NotRunning);
        }

        let frame = encode(kind, self.local, self.clock.now_ms(), payload)?;
        let max = self.transport.max_datagram();
        if frame.len() > max {
            return Err(Error::FrameTooLarge {
                size: frame.len(),
                max,
            });
        }
        Ok(frame)
    }

    fn submit(&self, destination: MacAddress, kind: MessageKind, frame: &[u8]) -> Result<()> {
        // count first: the completion may arrive before transmit returns
        self.state().counters.record_submitted();

        match self.transport.transmit(destination, frame) {
            Ok(()) => {
                debug!(%destination, %kind, len = frame.len(), "frame submitted");
                Ok(())
            }
            Err(err) => {
                self.state().counters.record_rejected();
                warn!(%destination, %kind, error = %err, "transport rejected frame");
                Err(Error::TransportRejected(err))
            }
        }
    }

    // ---- transport events ----

    /// Handle a datagram delivered by the radio.
    ///
    /// Malformed frames are counted and dropped; nothing is returned to the
    /// driver. Senders need not be registered: unknown senders still reach
    /// the handler but are not tracked.
    #[instrument(level = "trace", skip_all, fields(%source, len = frame.len()))]
    pub fn on_transport_receive(&self, source: MacAddress, frame: &[u8]) {
        if !self.is_running() {
            trace!("frame ignored after shutdown");
            return;
        }

        let message = match decode(Bytes::copy_from_slice(frame)) {
            Ok(message) => message,
            Err(err) => {
                if err.is_malformed_frame() {
                    self.state().counters.record_corrupted();
                }
                warn!(%source, error = %err, "discarding inbound frame");
                return;
            }
        };

        let now = self.clock.now_ms();
        let tracked = {
            let mut state = self.state();
            state.counters.record_received(message.kind());
            state.registry.touch(&source, now)
        };

        if message.sender() != source {
            debug!(%source, sender = %message.sender(), "frame sender differs from link source");
        }
        debug!(
            %source,
            kind = %message.kind(),
            len = message.payload().len(),
            tracked,
            "message received"
        );

        let handler = self.handlers().message.clone();
        if let Some(handler) = handler {
            handler.on_message(source, &message);
        }
    }

    /// Handle the radio's delivery report for an earlier send.
    #[instrument(level = "trace", skip_all, fields(%destination, delivered = delivered))]
    pub fn on_transport_send_complete(&self, destination: MacAddress, delivered: bool) {
        {
            let mut state = self.state();
            state.counters.record_completion(delivered);
            if delivered {
                state.registry.record_sent(&destination);
            }
        }

        if delivered {
            trace!("delivery confirmed");
        } else {
            warn!(%destination, "message delivery failed");
        }

        let handler = self.handlers().send.clone();
        if let Some(handler) = handler {
            handler.on_send_complete(destination, delivered);
        }
    }

    // ---- liveness & statistics ----

    /// Mark peers silent for longer than `timeout` inactive.
    ///
    /// Meant to be called periodically from the application loop. Returns
    /// the number of peers that went inactive.
    pub fn check_liveness(&self, timeout: Duration) -> usize {
        let now = self.clock.now_ms();
        let expired = self.state().registry.sweep(now, duration_to_ms(timeout));
        if expired > 0 {
            debug!(expired, "liveness sweep");
        }
        expired
    }

    /// [`check_liveness`](Self::check_liveness) with the configured timeout.
    pub fn sweep_idle_peers(&self) -> usize {
        self.check_liveness(self.config.liveness_timeout)
    }

    /// Snapshot of the aggregate counters.
    #[must_use]
    pub fn stats(&self) -> Stats {
        self.state().counters.snapshot()
    }

    /// Zero aggregate and per-peer counters.
    pub fn reset_stats(&self) {
        let mut state = self.state();
        state.counters.reset();
        state.registry.reset_counters();
    }

    /// Stop the radio. Later sends fail with [`Error::NotRunning`] and
    /// inbound events are ignored.
    pub fn shutdown(&self) {
        if self.running.swap(false, Ordering::AcqRel) {
            self.transport.stop();
            info!(local = %self.local, "messenger shut down");
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn handlers(&self) -> std::sync::RwLockReadGuard<'_, Handlers> {
        self.handlers.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn handlers_mut(&self) -> std::sync::RwLockWriteGuard<'_, Handlers> {
        self.handlers.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Transport> LinkEvents for Messenger<T> {
    fn on_receive(&self, source: MacAddress, frame: &[u8]) {
        self.on_transport_receive(source, frame);
    }

    fn on_send_complete(&self, destination: MacAddress, delivered: bool) {
        self.on_transport_send_complete(destination, delivered);
    }
}

impl<T: Transport> Drop for Messenger<T> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl<T: Transport + fmt::Debug> fmt::Debug for Messenger<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Messenger")
            .field("local", &self.local)
            .field("transport", &self.transport)
            .field("config", &self.config)
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}
