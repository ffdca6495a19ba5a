//! Peerlink message kinds

use std::fmt;

/// Message kinds carried in the first frame byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum MessageKind {
    /// Sensor readings
    SensorData = 0,
    /// Command for a remote actuator
    ActuatorCommand = 1,
    /// Device status update
    Status = 2,
    /// Configuration change
    Config = 3,
    /// Acknowledgment
    Ack = 4,
    /// Alert / warning
    Alert = 5,
    /// Time synchronization
    TimeSync = 6,
    /// Application-defined
    Custom = 99,
}

impl MessageKind {
    /// Number of defined kinds
    pub const COUNT: usize = 8;

    /// Every defined kind, in wire-code order
    pub const ALL: [Self; Self::COUNT] = [
        Self::SensorData,
        Self::ActuatorCommand,
        Self::Status,
        Self::Config,
        Self::Ack,
        Self::Alert,
        Self::TimeSync,
        Self::Custom,
    ];

    /// Convert from byte
    #[must_use]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::SensorData),
            1 => Some(Self::ActuatorCommand),
            2 => Some(Self::Status),
            3 => Some(Self::Config),
            4 => Some(Self::Ack),
            5 => Some(Self::Alert),
            6 => Some(Self::TimeSync),
            99 => Some(Self::Custom),
            _ => None,
        }
    }

    /// Convert to byte
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Dense index in `0..COUNT`, for per-kind tables
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::SensorData => 0,
            Self::ActuatorCommand => 1,
            Self::Status => 2,
            Self::Config => 3,
            Self::Ack => 4,
            Self::Alert => 5,
            Self::TimeSync => 6,
            Self::Custom => 7,
        }
    }
}

impl TryFrom<u8> for MessageKind {
    type Error = super::Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_u8(value).ok_or(super::Error::UnknownKind { kind_byte: value })
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::SensorData => "SensorData",
            Self::ActuatorCommand => "ActuatorCommand",
            Self::Status => "Status",
            Self::Config => "Config",
            Self::Ack => "Ack",
            Self::Alert => "Alert",
            Self::TimeSync => "TimeSync",
            Self::Custom => "Custom",
        };
        write!(f, "{name}")
    }
}
