// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! IP ECN type and contract
//!
//! ECN is the 2-bit value carried below the DSCP in the IPv4 DS field.

use etherparse::IpEcn;

/// Explicit congestion notification value
#[repr(transparent)]
#[derive(Copy, Clone, Default, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u8", into = "u8"))]
pub struct Ecn(pub(crate) IpEcn);

/// Errors which may occur relating to illegal [`Ecn`] values
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InvalidEcnError {
    /// Two bit value of [`Ecn`] exceeded
    #[error("{0} is too large to be a legal ECN (two bits max)")]
    TooLarge(u8),
}

impl Ecn {
    /// The largest legal raw [`Ecn`] value
    pub const MAX_U8: u8 = 0b11;

    /// Create an [`Ecn`] from a raw u8.
    ///
    /// # Errors
    ///
    /// Will return an [`InvalidEcnError`] if the supplied value is larger than two bits
    pub fn new(raw: u8) -> Result<Ecn, InvalidEcnError> {
        Ok(Ecn(
            IpEcn::try_new(raw).map_err(|e| InvalidEcnError::TooLarge(e.actual))?
        ))
    }

    /// Return the underlying 2-bit ECN value as a `u8`.
    ///
    /// This returns only the ECN portion (0..=3). It does **not** include DSCP bits.
    #[must_use]
    pub fn value(self) -> u8 {
        self.0.value()
    }
}

impl From<IpEcn> for Ecn {
    fn from(v: IpEcn) -> Self {
        Ecn(v)
    }
}

impl From<Ecn> for IpEcn {
    fn from(v: Ecn) -> Self {
        v.0
    }
}

impl From<Ecn> for u8 {
    fn from(v: Ecn) -> Self {
        v.value()
    }
}

impl TryFrom<u8> for Ecn {
    type Error = InvalidEcnError;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        Ecn::new(raw)
    }
}

impl core::fmt::Display for Ecn {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.value())
    }
}

#[cfg(any(test, feature = "bolero"))]
mod contract {
    use super::Ecn;
    use bolero::{Driver, TypeGenerator};

    impl TypeGenerator for Ecn {
        fn generate<D: Driver>(driver: &mut D) -> Option<Self> {
            Some(Ecn::new(driver.produce::<u8>()? & Ecn::MAX_U8).unwrap_or_else(|_| unreachable!()))
        }
    }
}
