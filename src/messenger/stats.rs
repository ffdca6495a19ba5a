use crate::protocol::MessageKind;

/// Point-in-time snapshot of the messenger's aggregate counters.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stats {
    /// Sends the link layer confirmed.
    pub sent: u64,
    /// Validated inbound messages.
    pub received: u64,
    /// Sends rejected by the transport or reported undelivered.
    pub failed: u64,
    /// Inbound frames discarded as truncated, corrupt, or unknown.
    pub corrupted: u64,
    /// Sends handed to the transport and still awaiting completion.
    pub in_flight: u64,
    /// Validated inbound messages per kind, indexed by [`MessageKind::index`].
    pub received_by_kind: [u64; MessageKind::COUNT],
}

impl Stats {
    /// Validated inbound messages of `kind`.
    #[must_use]
    pub const fn received_of(&self, kind: MessageKind) -> u64 {
        self.received_by_kind[kind.index()]
    }

    /// Fraction of completed sends that were delivered.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn delivery_ratio(&self) -> Option<f64> {
        let completed = self.sent + self.failed;
        if completed == 0 {
            return None;
        }
        Some(self.sent as f64 / completed as f64)
    }
}

/// Counters mutated under the messenger's state lock.
#[derive(Debug, Default)]
pub(crate) struct Counters {
    current: Stats,
}

impl Counters {
    #[inline]
    pub(crate) fn record_submitted(&mut self) {
        self.current.in_flight += 1;
    }

    /// Transport refused a frame synchronously; it will never complete.
    #[inline]
    pub(crate) fn record_rejected(&mut self) {
        self.current.in_flight = self.current.in_flight.saturating_sub(1);
        self.current.failed += 1;
    }

    #[inline]
    pub(crate) fn record_completion(&mut self, delivered: bool) {
        self.current.in_flight = self.current.in_flight.saturating_sub(1);
        if delivered {
            self.current.sent += 1;
        } else {
            self.current.failed += 1;
        }
    }

    #[inline]
    pub(crate) fn record_received(&mut self, kind: MessageKind) {
        self.current.received += 1;
        self.current.received_by_kind[kind.index()] += 1;
    }

    #[inline]
    pub(crate) fn record_corrupted(&mut self) {
        self.current.corrupted += 1;
    }

    /// Zero everything except the in-flight gauge.
    pub(crate) fn reset(&mut self) {
        self.current = Stats {
            in_flight: self.current.in_flight,
            ..Stats::default()
        };
    }

    #[inline]
    pub(crate) fn snapshot(&self) -> Stats {
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_moves_in_flight_to_outcome() {
        let mut counters = Counters::default();
        counters.record_submitted();
        counters.record_submitted();
        counters.record_submitted();
        counters.record_completion(true);
        counters.record_completion(false);
        counters.record_rejected();

        let stats = counters.snapshot();
        assert_eq!((stats.sent, stats.failed, stats.in_flight), (1, 2, 0));
        assert_eq!(stats.delivery_ratio(), Some(1.0 / 3.0));
    }

    #[test]
    fn late_completion_does_not_underflow() {
        let mut counters = Counters::default();
        counters.record_completion(true);
        assert_eq!(counters.snapshot().in_flight, 0);
        assert_eq!(counters.snapshot().sent, 1);
    }

    #[test]
    fn per_kind_and_reset() {
        let mut counters = Counters::default();
        counters.record_received(MessageKind::Alert);
        counters.record_received(MessageKind::Alert);
        counters.record_received(MessageKind::Custom);
        counters.record_corrupted();
        counters.record_submitted();

        let stats = counters.snapshot();
        assert_eq!(stats.received, 3);
        assert_eq!(stats.received_of(MessageKind::Alert), 2);
        assert_eq!(stats.received_of(MessageKind::Custom), 1);
        assert_eq!(stats.corrupted, 1);

        counters.reset();
        let stats = counters.snapshot();
        assert_eq!(stats.received, 0);
        assert_eq!(stats.received_of(MessageKind::Alert), 0);
        assert_eq!(stats.in_flight, 1);
        assert_eq!(Stats::default().delivery_ratio(), None);
    }
}
