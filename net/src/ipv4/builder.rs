// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Construction of [`Ipv4Header`] values from explicit fields.

use crate::ip::{Dscp, Ecn, Protocol};
use crate::ipv4::codec::MIN_HEADER_LEN;
use crate::ipv4::fields::{FragmentOffset, Ipv4Flags, Version};
use crate::ipv4::options::Ipv4Options;
use crate::ipv4::Ipv4Header;
use core::net::Ipv4Addr;

/// Errors which may occur when building an [`Ipv4Header`]
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ipv4BuildError {
    /// The packet would not fit the 16-bit total length field.
    #[error("packet of {0} bytes exceeds the maximum ipv4 total length of 65535")]
    TooLong(usize),
}

/// Builder for [`Ipv4Header`].
///
/// Field values are already validated by their types, so only the packet length can make
/// [`Ipv4HeaderBuilder::build`] fail.
#[derive(Debug, Clone)]
#[must_use]
pub struct Ipv4HeaderBuilder {
    header: Ipv4Header,
}

impl Ipv4HeaderBuilder {
    /// Time to live of a freshly built header
    pub const DEFAULT_TTL: u8 = 64;

    /// Start a header with version 4, a TTL of [`Ipv4HeaderBuilder::DEFAULT_TTL`], no options, an
    /// empty payload and every other field zero.
    pub fn new(source: Ipv4Addr, destination: Ipv4Addr, protocol: Protocol) -> Ipv4HeaderBuilder {
        Ipv4HeaderBuilder {
            header: Ipv4Header {
                version: Version::V4,
                dscp: Dscp::MIN,
                ecn: Ecn::default(),
                identification: 0,
                flags: Ipv4Flags::empty(),
                fragment_offset: FragmentOffset::ZERO,
                ttl: Self::DEFAULT_TTL,
                protocol,
                checksum: 0,
                source,
                destination,
                options: Ipv4Options::new(),
                payload: Vec::new(),
            },
        }
    }

    /// Set the version field
    pub fn version(mut self, version: Version) -> Self {
        self.header.version = version;
        self
    }

    /// Set the differentiated services code point
    pub fn dscp(mut self, dscp: Dscp) -> Self {
        self.header.dscp = dscp;
        self
    }

    /// Set the explicit congestion notification
    pub fn ecn(mut self, ecn: Ecn) -> Self {
        self.header.ecn = ecn;
        self
    }

    /// Set the identification field
    pub fn identification(mut self, identification: u16) -> Self {
        self.header.identification = identification;
        self
    }

    /// Set the flags
    pub fn flags(mut self, flags: Ipv4Flags) -> Self {
        self.header.flags = flags;
        self
    }

    /// Set the fragment offset
    pub fn fragment_offset(mut self, fragment_offset: FragmentOffset) -> Self {
        self.header.fragment_offset = fragment_offset;
        self
    }

    /// Set the time to live
    pub fn ttl(mut self, ttl: u8) -> Self {
        self.header.ttl = ttl;
        self
    }

    /// Set the protocol
    pub fn protocol(mut self, protocol: Protocol) -> Self {
        self.header.protocol = protocol;
        self
    }

    /// Set the stored checksum.
    ///
    /// The checksum is never computed implicitly.
    /// See [`Ipv4Header::with_computed_checksum`].
    pub fn checksum(mut self, checksum: u16) -> Self {
        self.header.checksum = checksum;
        self
    }

    /// Set the source address
    pub fn source(mut self, source: Ipv4Addr) -> Self {
        self.header.source = source;
        self
    }

    /// Set the destination address
    pub fn destination(mut self, destination: Ipv4Addr) -> Self {
        self.header.destination = destination;
        self
    }

    /// Set the options
    pub fn options(mut self, options: impl Into<Ipv4Options>) -> Self {
        self.header.options = options.into();
        self
    }

    /// Set the payload
    pub fn payload(mut self, payload: impl Into<Vec<u8>>) -> Self {
        self.header.payload = payload.into();
        self
    }

    /// Produce the header.
    ///
    /// More than [`Ipv4Options::MAX_WORDS`] option words are accepted here and reported when
    /// encoding.
    ///
    /// # Errors
    ///
    /// Returns [`Ipv4BuildError::TooLong`] if the header (counting at most the maximum number of
    /// options) and payload exceed 65535 bytes.
    pub fn build(self) -> Result<Ipv4Header, Ipv4BuildError> {
        let option_words = self.header.options.len().min(Ipv4Options::MAX_WORDS);
        let total = MIN_HEADER_LEN + option_words * 4 + self.header.payload.len();
        if total > usize::from(u16::MAX) {
            return Err(Ipv4BuildError::TooLong(total));
        }
        Ok(self.header)
    }
}

impl From<Ipv4Header> for Ipv4HeaderBuilder {
    fn from(header: Ipv4Header) -> Self {
        Ipv4HeaderBuilder { header }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod test {
    use super::*;

    fn builder() -> Ipv4HeaderBuilder {
        Ipv4HeaderBuilder::new(
            Ipv4Addr::new(10, 1, 1, 1),
            Ipv4Addr::new(10, 2, 2, 2),
            Protocol::TCP,
        )
    }

    #[test]
    fn defaults() {
        let header = builder().build().unwrap();
        assert_eq!(header.version(), Version::V4);
        assert_eq!(header.ttl(), Ipv4HeaderBuilder::DEFAULT_TTL);
        assert_eq!(header.dscp().value(), 0);
        assert_eq!(header.ecn().value(), 0);
        assert_eq!(header.identification(), 0);
        assert!(header.flags().is_empty());
        assert_eq!(header.fragment_offset(), FragmentOffset::ZERO);
        assert_eq!(header.checksum(), 0);
        assert_eq!(header.ihl(), 5);
        assert_eq!(header.total_len(), 20);
    }

    #[test]
    fn largest_payload_builds() {
        let header = builder().payload(vec![0; 65515]).build().unwrap();
        assert_eq!(header.total_len(), 65535);
        assert_eq!(header.encode().unwrap().len(), 65535);
    }

    #[test]
    fn one_byte_more_is_too_long() {
        assert_eq!(
            builder().payload(vec![0; 65516]).build().unwrap_err(),
            Ipv4BuildError::TooLong(65536)
        );
    }

    #[test]
    fn options_count_towards_length() {
        assert_eq!(
            builder()
                .options([0_u32; 2])
                .payload(vec![0; 65508])
                .build()
                .unwrap_err(),
            Ipv4BuildError::TooLong(65536)
        );
    }

    #[test]
    fn to_builder_keeps_every_field() {
        let original = builder()
            .dscp(Dscp::new(46).unwrap())
            .ecn(Ecn::new(1).unwrap())
            .identification(7)
            .flags(Ipv4Flags::DONT_FRAGMENT | Ipv4Flags::MORE_FRAGMENTS)
            .fragment_offset(FragmentOffset::new(9).unwrap())
            .checksum(0xdead)
            .options([0x0101_0101_u32])
            .payload(*b"hello")
            .build()
            .unwrap();
        let copy = original.to_builder().build().unwrap();
        assert_eq!(copy, original);
        let changed = original
            .to_builder()
            .destination(Ipv4Addr::LOCALHOST)
            .build()
            .unwrap();
        assert_eq!(changed.destination(), Ipv4Addr::LOCALHOST);
        assert_eq!(changed.source(), original.source());
        assert_eq!(changed.checksum(), 0xdead);
    }
}
