//! Six-byte hardware addresses

use std::fmt;
use std::str::FromStr;

use super::Error;

/// Hardware (MAC) address identifying a device on the radio link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    /// Address length in bytes
    pub const LEN: usize = 6;

    /// Link-layer broadcast address
    pub const BROADCAST: Self = Self([0xFF; 6]);

    /// Create from raw octets
    #[must_use]
    pub const fn new(octets: [u8; 6]) -> Self {
        Self(octets)
    }

    /// Raw octets
    #[must_use]
    pub const fn octets(&self) -> [u8; 6] {
        self.0
    }

    /// Borrow the octets
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 6] {
        &self.0
    }

    /// Check for the broadcast address
    #[must_use]
    pub fn is_broadcast(&self) -> bool {
        *self == Self::BROADCAST
    }

    /// Read an address from the first six bytes of `bytes`.
    #[must_use]
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let octets: [u8; 6] = bytes.get(..Self::LEN)?.try_into().ok()?;
        Some(Self(octets))
    }
}

impl From<[u8; 6]> for MacAddress {
    fn from(octets: [u8; 6]) -> Self {
        Self(octets)
    }
}

impl From<MacAddress> for [u8; 6] {
    fn from(address: MacAddress) -> Self {
        address.0
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02X}:{b:02X}:{c:02X}:{d:02X}:{e:02X}:{g:02X}")
    }
}

impl FromStr for MacAddress {
    type Err = Error;

    /// Parse `AA:BB:CC:DD:EE:FF` (`-` separators and lower case accepted).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidAddress(s.to_owned());
        let mut octets = [0u8; 6];
        let mut parts = s.split([':', '-']);

        for octet in &mut octets {
            let part = parts.next().ok_or_else(invalid)?;
            if part.len() != 2 {
                return Err(invalid());
            }
            *octet = u8::from_str_radix(part, 16).map_err(|_| invalid())?;
        }

        if parts.next().is_some() {
            return Err(invalid());
        }

        Ok(Self(octets))
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for MacAddress {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for MacAddress {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_upper_hex_with_colons() {
        let address = MacAddress::new([0xAA, 0xBB, 0xCC, 0x0D, 0xEE, 0x01]);
        assert_eq!(address.to_string(), "AA:BB:CC:0D:EE:01");
    }

    #[test]
    fn test_parse_accepts_common_forms() {
        let expected = MacAddress::new([0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF]);
        assert_eq!("AA:BB:CC:DD:EE:FF".parse::<MacAddress>().unwrap(), expected);
        assert_eq!("aa-bb-cc-dd-ee-ff".parse::<MacAddress>().unwrap(), expected);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for text in ["", "AA:BB:CC:DD:EE", "AA:BB:CC:DD:EE:FF:00", "AA:BB:CC:DD:EE:GG", "A:BB:CC:DD:EE:FF0"] {
            assert!(
                matches!(text.parse::<MacAddress>(), Err(Error::InvalidAddress(_))),
                "{text:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_broadcast() {
        assert!(MacAddress::BROADCAST.is_broadcast());
        assert_eq!(MacAddress::BROADCAST.to_string(), "FF:FF:FF:FF:FF:FF");
        assert!(!MacAddress::default().is_broadcast());
    }

    #[test]
    fn test_from_slice_needs_six_bytes() {
        assert!(MacAddress::from_slice(&[1, 2, 3, 4, 5]).is_none());
        assert_eq!(
            MacAddress::from_slice(&[1, 2, 3, 4, 5, 6, 7]),
            Some(MacAddress::new([1, 2, 3, 4, 5, 6]))
        );
    }
}
