// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! IPv4 header options, kept as opaque 32-bit words.

/// The options of an IPv4 header as an ordered list of 32-bit words.
///
/// Individual options are not interpreted.
/// The list may hold more than [`Ipv4Options::MAX_WORDS`] words; such a header can be built but
/// has no wire form, and encoding it fails with a [`TooManyOptionsError`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Ipv4Options(Vec<u32>);

/// The options do not fit in the 4-bit internet header length field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{words} option words exceed the maximum of {max}", max = Ipv4Options::MAX_WORDS)]
pub struct TooManyOptionsError {
    pub(crate) words: usize,
}

impl TooManyOptionsError {
    /// The number of option words which were supplied
    #[must_use]
    pub fn words(&self) -> usize {
        self.words
    }
}

impl Ipv4Options {
    /// The maximum number of option words: an IHL of 15 less the 5 words of the fixed header.
    pub const MAX_WORDS: usize = 10;

    /// An empty set of options
    #[must_use]
    pub const fn new() -> Ipv4Options {
        Ipv4Options(Vec::new())
    }

    /// The option words in header order
    #[must_use]
    pub fn words(&self) -> &[u32] {
        &self.0
    }

    /// The number of option words
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if there are no options
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The number of bytes these options occupy on the wire
    #[must_use]
    pub fn byte_len(&self) -> usize {
        self.0.len() * 4
    }

    /// Check that the options fit in an IPv4 header.
    ///
    /// # Errors
    ///
    /// Returns [`TooManyOptionsError`] if there are more than [`Ipv4Options::MAX_WORDS`] words.
    pub fn check_fits(&self) -> Result<(), TooManyOptionsError> {
        if self.len() > Ipv4Options::MAX_WORDS {
            return Err(TooManyOptionsError { words: self.len() });
        }
        Ok(())
    }
}

impl From<Vec<u32>> for Ipv4Options {
    fn from(words: Vec<u32>) -> Self {
        Ipv4Options(words)
    }
}

impl<const N: usize> From<[u32; N]> for Ipv4Options {
    fn from(words: [u32; N]) -> Self {
        Ipv4Options(words.to_vec())
    }
}

impl From<&[u32]> for Ipv4Options {
    fn from(words: &[u32]) -> Self {
        Ipv4Options(words.to_vec())
    }
}

impl FromIterator<u32> for Ipv4Options {
    fn from_iter<T: IntoIterator<Item = u32>>(iter: T) -> Self {
        Ipv4Options(iter.into_iter().collect())
    }
}

impl AsRef<[u32]> for Ipv4Options {
    fn as_ref(&self) -> &[u32] {
        &self.0
    }
}

#[cfg(any(test, feature = "bolero"))]
mod contract {
    use super::Ipv4Options;
    use bolero::{Driver, TypeGenerator};

    /// Only generates options which fit in a header.
    impl TypeGenerator for Ipv4Options {
        fn generate<D: Driver>(driver: &mut D) -> Option<Self> {
            #[allow(clippy::cast_possible_truncation)] // MAX_WORDS is tiny
            let len = driver.produce::<u8>()? % (Ipv4Options::MAX_WORDS as u8 + 1);
            (0..len).map(|_| driver.produce::<u32>()).collect()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod test {
    use super::*;

    #[test]
    fn ten_words_fit() {
        let options: Ipv4Options = (0..10).collect();
        assert_eq!(options.byte_len(), 40);
        options.check_fits().unwrap();
    }

    #[test]
    fn eleven_words_do_not_fit() {
        let options: Ipv4Options = (0..11).collect();
        assert_eq!(options.check_fits().unwrap_err().words(), 11);
    }
}
