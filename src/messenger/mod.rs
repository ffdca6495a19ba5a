//! Messaging manager
//!
//! Ties the codec, peer registry, and transport together: builds and submits
//! outgoing frames, validates and dispatches inbound ones, and keeps
//! delivery statistics.

mod config;
mod handler;
mod manager;
mod stats;
#[cfg(feature = "serde")]
mod status;

pub use config::{DEFAULT_LIVENESS_TIMEOUT, DEFAULT_MAX_PEERS, MessengerConfig};
pub use handler::{KindRouter, MessageHandler, SendHandler};
pub use manager::{BroadcastSummary, Messenger, MessengerBuilder};
pub use stats::Stats;
#[cfg(feature = "serde")]
pub use status::StatusReport;
