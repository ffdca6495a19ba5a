//! JSON status payload exchanged between nodes.

use serde::{Deserialize, Serialize};

/// Device status broadcast with [`MessageKind::Status`](crate::MessageKind::Status).
///
/// Serializes as `{"device":..,"version":..,"uptime":..,"freeHeap":..}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    /// Device name
    pub device: String,
    /// Firmware version
    pub version: String,
    /// Milliseconds since boot
    #[serde(rename = "uptime")]
    pub uptime_ms: u64,
    /// Free heap in bytes, when the platform reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub free_heap: Option<u32>,
}

impl StatusReport {
    /// Create a report without heap information.
    pub fn new(device: impl Into<String>, version: impl Into<String>, uptime_ms: u64) -> Self {
        Self {
            device: device.into(),
            version: version.into(),
            uptime_ms,
            free_heap: None,
        }
    }

    /// Attach the free heap size.
    #[must_use]
    pub const fn with_free_heap(mut self, bytes: u32) -> Self {
        self.free_heap = Some(bytes);
        self
    }
}
