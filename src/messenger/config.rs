//! Messenger configuration

use std::time::Duration;

use crate::protocol::{Error, Result};

/// Default peer table size (unencrypted radio peer limit leaves room for 5)
pub const DEFAULT_MAX_PEERS: usize = 5;

/// Default silence after which a peer is considered inactive
pub const DEFAULT_LIVENESS_TIMEOUT: Duration = Duration::from_secs(60);

/// Messenger configuration options.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MessengerConfig {
    /// Maximum number of registered peers.
    pub max_peers: usize,
    /// Silence after which [`Messenger::sweep_idle_peers`](super::Messenger::sweep_idle_peers)
    /// marks a peer inactive.
    pub liveness_timeout: Duration,
}

impl MessengerConfig {
    /// Set the peer table size.
    #[must_use]
    pub const fn with_max_peers(mut self, max_peers: usize) -> Self {
        self.max_peers = max_peers;
        self
    }

    /// Set the liveness timeout.
    #[must_use]
    pub const fn with_liveness_timeout(mut self, timeout: Duration) -> Self {
        self.liveness_timeout = timeout;
        self
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        if self.max_peers == 0 {
            return Err(Error::InvalidConfig("max_peers must be at least 1"));
        }
        if self.liveness_timeout.is_zero() {
            return Err(Error::InvalidConfig("liveness_timeout must be non-zero"));
        }
        Ok(())
    }
}

impl Default for MessengerConfig {
    fn default() -> Self {
        Self {
            max_peers: DEFAULT_MAX_PEERS,
            liveness_timeout: DEFAULT_LIVENESS_TIMEOUT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = MessengerConfig::default();
        assert_eq!(config.max_peers, 5);
        assert_eq!(config.liveness_timeout, Duration::from_secs(60));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_zero_values() {
        let no_peers = MessengerConfig::default().with_max_peers(0);
        assert!(matches!(no_peers.validate(), Err(Error::InvalidConfig(_))));

        let no_timeout = MessengerConfig::default().with_liveness_timeout(Duration::ZERO);
        assert!(matches!(no_timeout.validate(), Err(Error::InvalidConfig(_))));
    }
}
