// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Sub-byte fields of the IPv4 header which have no counterpart in IPv6.

use etherparse::IpFragOffset;

/// The 4-bit IP version field.
///
/// Any 4-bit value is representable so that decoding never loses information.
/// Only [`Version::V4`] denotes an IPv4 header.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u8", into = "u8"))]
pub struct Version(u8);

/// Errors which may occur relating to illegal [`Version`] values
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InvalidVersionError {
    /// Four bit value of [`Version`] exceeded
    #[error("{0} is too large to be an IP version (four bits max)")]
    TooLarge(u8),
}

impl Version {
    /// The version number of IPv4
    pub const V4: Version = Version(4);
    /// The largest legal raw [`Version`] value
    pub const MAX_U8: u8 = 0b1111;

    /// Create a new [`Version`]
    ///
    /// # Errors
    ///
    /// Returns [`InvalidVersionError::TooLarge`] if `raw` exceeds four bits.
    pub fn new(raw: u8) -> Result<Version, InvalidVersionError> {
        if raw > Version::MAX_U8 {
            return Err(InvalidVersionError::TooLarge(raw));
        }
        Ok(Version(raw))
    }

    /// The raw 4-bit version number
    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Version {
    fn default() -> Self {
        Version::V4
    }
}

impl From<Version> for u8 {
    fn from(value: Version) -> Self {
        value.0
    }
}

impl TryFrom<u8> for Version {
    type Error = InvalidVersionError;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        Version::new(raw)
    }
}

bitflags::bitflags! {
    /// The 3-bit flags field of an IPv4 header.
    ///
    /// ```text
    ///   0   1   2
    /// +---+---+---+
    /// |   | D | M |
    /// | R | F | F |
    /// +---+---+---+
    /// ```
    ///
    /// The reserved bit must be zero on the wire but is kept if a peer sets it.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(try_from = "u8", into = "u8"))]
    pub struct Ipv4Flags: u8 {
        /// Reserved, must be zero.
        const RESERVED = 0b100;
        /// Don't fragment
        const DONT_FRAGMENT = 0b010;
        /// More fragments follow this one
        const MORE_FRAGMENTS = 0b001;
    }
}

/// Errors which may occur relating to illegal [`Ipv4Flags`] values
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InvalidFlagsError {
    /// Three bit value of [`Ipv4Flags`] exceeded
    #[error("{0:#05b} is too large to be a legal set of IPv4 flags (three bits max)")]
    TooLarge(u8),
}

impl Ipv4Flags {
    /// Create [`Ipv4Flags`] from the raw 3-bit field.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidFlagsError::TooLarge`] if `raw` exceeds three bits.
    pub fn new(raw: u8) -> Result<Ipv4Flags, InvalidFlagsError> {
        Ipv4Flags::from_bits(raw).ok_or(InvalidFlagsError::TooLarge(raw))
    }
}

impl From<Ipv4Flags> for u8 {
    fn from(flags: Ipv4Flags) -> u8 {
        flags.bits()
    }
}

impl TryFrom<u8> for Ipv4Flags {
    type Error = InvalidFlagsError;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        Ipv4Flags::new(raw)
    }
}

/// The 13-bit fragment offset, in units of 8 bytes.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u16", into = "u16"))]
pub struct FragmentOffset(IpFragOffset);

/// Errors which may occur relating to illegal [`FragmentOffset`] values
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InvalidFragmentOffsetError {
    /// Thirteen bit value of [`FragmentOffset`] exceeded
    #[error("fragment offset {0} too large ({MAX} is max legal value)", MAX = FragmentOffset::MAX_U16)]
    TooBig(u16),
}

impl FragmentOffset {
    /// Offset of the first (or only) fragment
    pub const ZERO: FragmentOffset = FragmentOffset(IpFragOffset::ZERO);
    /// The largest legal raw [`FragmentOffset`] value
    pub const MAX_U16: u16 = IpFragOffset::MAX_U16;

    /// Create a new [`FragmentOffset`]
    ///
    /// # Errors
    ///
    /// Returns [`InvalidFragmentOffsetError::TooBig`] if `raw` exceeds 13 bits.
    pub fn new(raw: u16) -> Result<FragmentOffset, InvalidFragmentOffsetError> {
        Ok(FragmentOffset(
            IpFragOffset::try_new(raw).map_err(|e| InvalidFragmentOffsetError::TooBig(e.actual))?,
        ))
    }

    /// The raw offset in units of 8 bytes
    #[must_use]
    pub fn value(self) -> u16 {
        self.0.value()
    }

    /// The offset in bytes
    #[must_use]
    pub fn byte_offset(self) -> usize {
        usize::from(self.value()) * 8
    }
}

impl Default for FragmentOffset {
    fn default() -> Self {
        FragmentOffset::ZERO
    }
}

impl From<FragmentOffset> for u16 {
    fn from(value: FragmentOffset) -> Self {
        value.value()
    }
}

impl TryFrom<u16> for FragmentOffset {
    type Error = InvalidFragmentOffsetError;

    fn try_from(raw: u16) -> Result<Self, Self::Error> {
        FragmentOffset::new(raw)
    }
}

#[cfg(any(test, feature = "bolero"))]
mod contract {
    use super::{FragmentOffset, Ipv4Flags, Version};
    use bolero::{Driver, TypeGenerator};

    impl TypeGenerator for Version {
        fn generate<D: Driver>(driver: &mut D) -> Option<Self> {
            Some(Version(driver.produce::<u8>()? & Version::MAX_U8))
        }
    }

    impl TypeGenerator for Ipv4Flags {
        fn generate<D: Driver>(driver: &mut D) -> Option<Self> {
            Some(Ipv4Flags::from_bits_truncate(driver.produce()?))
        }
    }

    impl TypeGenerator for FragmentOffset {
        fn generate<D: Driver>(driver: &mut D) -> Option<Self> {
            let raw = driver.produce::<u16>()? & FragmentOffset::MAX_U16;
            Some(FragmentOffset::new(raw).unwrap_or_else(|_| unreachable!()))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod test {
    use super::*;

    #[test]
    fn version_is_four_bits() {
        assert_eq!(Version::new(15).unwrap().value(), 15);
        assert_eq!(Version::new(16).unwrap_err(), InvalidVersionError::TooLarge(16));
        assert_eq!(Version::default(), Version::V4);
    }

    #[test]
    fn flags_are_three_bits() {
        assert_eq!(Ipv4Flags::new(0b111).unwrap(), Ipv4Flags::all());
        assert_eq!(Ipv4Flags::new(0b1000).unwrap_err(), InvalidFlagsError::TooLarge(8));
        let df = Ipv4Flags::new(0b010).unwrap();
        assert!(df.contains(Ipv4Flags::DONT_FRAGMENT));
        assert!(!df.contains(Ipv4Flags::MORE_FRAGMENTS));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn flags_serialize_as_validated_integers() {
        let flags = Ipv4Flags::DONT_FRAGMENT | Ipv4Flags::MORE_FRAGMENTS;
        assert_eq!(serde_json::to_string(&flags).unwrap(), "3");
        assert_eq!(serde_json::from_str::<Ipv4Flags>("3").unwrap(), flags);
        assert!(serde_json::from_str::<Ipv4Flags>("8").is_err());
        assert!(serde_json::from_str::<Ipv4Flags>("\"0x8\"").is_err());
    }

    #[test]
    fn fragment_offset_is_thirteen_bits() {
        assert_eq!(FragmentOffset::MAX_U16, 0x1fff);
        assert_eq!(FragmentOffset::new(0x1fff).unwrap().value(), 0x1fff);
        assert_eq!(
            FragmentOffset::new(0x2000).unwrap_err(),
            InvalidFragmentOffsetError::TooBig(0x2000)
        );
        assert_eq!(FragmentOffset::new(3).unwrap().byte_offset(), 24);
    }

    #[test]
    fn fragment_offset_contract() {
        bolero::check!()
            .with_type()
            .cloned()
            .for_each(|raw: u16| match FragmentOffset::new(raw) {
                Ok(offset) => assert_eq!(u16::from(offset), raw),
                Err(InvalidFragmentOffsetError::TooBig(x)) => {
                    assert_eq!(x, raw);
                    assert!(raw > FragmentOffset::MAX_U16);
                }
            });
    }
}
