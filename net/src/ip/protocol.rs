// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The upper layer protocol number carried by an IPv4 header.

use etherparse::IpNumber;

/// Thin wrapper around [`IpNumber`].
///
/// All 256 values are legal; the codec never interprets them.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "u8", into = "u8"))]
pub struct Protocol(pub IpNumber);

impl Protocol {
    /// Internet Control Message Protocol
    pub const ICMP: Protocol = Protocol(IpNumber::ICMP);
    /// Transmission Control Protocol
    pub const TCP: Protocol = Protocol(IpNumber::TCP);
    /// User Datagram Protocol
    pub const UDP: Protocol = Protocol(IpNumber::UDP);

    /// Create a new [`Protocol`] from its raw number
    #[must_use]
    pub const fn new(raw: u8) -> Protocol {
        Protocol(IpNumber(raw))
    }

    /// The raw protocol number
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0.0
    }
}

impl Default for Protocol {
    fn default() -> Self {
        Protocol::new(0)
    }
}

impl From<u8> for Protocol {
    fn from(raw: u8) -> Self {
        Protocol::new(raw)
    }
}

impl From<Protocol> for u8 {
    fn from(value: Protocol) -> Self {
        value.value()
    }
}

impl From<IpNumber> for Protocol {
    fn from(value: IpNumber) -> Self {
        Protocol(value)
    }
}

impl From<Protocol> for IpNumber {
    fn from(value: Protocol) -> Self {
        value.0
    }
}

impl core::fmt::Display for Protocol {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.0.keyword_str() {
            Some(keyword) => write!(f, "{} ({keyword})", self.value()),
            None => write!(f, "{}", self.value()),
        }
    }
}

#[cfg(any(test, feature = "bolero"))]
mod contract {
    use super::Protocol;
    use bolero::{Driver, TypeGenerator};

    impl TypeGenerator for Protocol {
        fn generate<D: Driver>(driver: &mut D) -> Option<Self> {
            Some(Protocol::new(driver.produce()?))
        }
    }
}
