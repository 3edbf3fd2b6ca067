// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Traits for moving headers between their wire form and their structured form.

use core::num::NonZero;

/// A type which can be parsed from the front of a byte buffer.
pub trait Parse: Sized {
    /// The error returned when the buffer does not hold a legal `Self`.
    type Error: core::error::Error;

    /// Parse `Self` from `buf`, returning the value and the number of bytes consumed.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if `buf` does not hold a legal `Self`.
    fn parse(buf: &[u8]) -> Result<(Self, NonZero<usize>), Self::Error>;
}

/// A type which can be written out in its wire form.
pub trait DeParse {
    /// The error returned when `self` can not be written.
    type Error: core::error::Error;

    /// The number of bytes [`DeParse::deparse`] will write.
    fn size(&self) -> NonZero<usize>;

    /// Write `self` to the front of `buf`, returning the number of bytes written.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if `buf` is too short or `self` has no legal wire form.
    fn deparse(&self, buf: &mut [u8]) -> Result<NonZero<usize>, Self::Error>;
}

/// A buffer was shorter than required.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("expected at least {expected} bytes, got {actual}")]
pub struct LengthError {
    pub(crate) expected: NonZero<usize>,
    pub(crate) actual: usize,
}

impl LengthError {
    /// The minimum number of bytes which were required
    #[must_use]
    pub fn expected(&self) -> NonZero<usize> {
        self.expected
    }

    /// The number of bytes which were available
    #[must_use]
    pub fn actual(&self) -> usize {
        self.actual
    }
}
