// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! IPv4 header type, codec and checksum

use crate::ip::{Dscp, Ecn, Protocol};
use crate::parse::{DeParse, LengthError, Parse};
use core::net::Ipv4Addr;
use core::num::NonZero;

mod builder;
mod codec;
mod display;
pub mod fields;
pub mod options;

pub use builder::{Ipv4BuildError, Ipv4HeaderBuilder};
pub use fields::{FragmentOffset, Ipv4Flags, Version};
pub use options::{Ipv4Options, TooManyOptionsError};

/// An IPv4 header together with the payload it carries.
///
/// Values are produced whole, either by [`Ipv4Header::decode`] or by an [`Ipv4HeaderBuilder`],
/// and are never modified in place.
/// Use [`Ipv4Header::to_builder`] (or the `with_*` methods) to derive a changed copy.
///
/// The internet header length and the total length are not stored.
/// They are always derived from the options and payload, so they can not disagree with them.
/// The checksum _is_ stored, exactly as decoded or supplied; see [`Ipv4Header::verify_checksum`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ipv4Header {
    pub(crate) version: Version,
    pub(crate) dscp: Dscp,
    pub(crate) ecn: Ecn,
    pub(crate) identification: u16,
    pub(crate) flags: Ipv4Flags,
    pub(crate) fragment_offset: FragmentOffset,
    pub(crate) ttl: u8,
    pub(crate) protocol: Protocol,
    pub(crate) checksum: u16,
    pub(crate) source: Ipv4Addr,
    pub(crate) destination: Ipv4Addr,
    pub(crate) options: Ipv4Options,
    pub(crate) payload: Vec<u8>,
}

/// Errors which may occur while decoding an [`Ipv4Header`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Ipv4DecodeError {
    /// The buffer can not even hold the fixed part of a header.
    #[error("buffer too short for an ipv4 header: {0}")]
    TooShort(LengthError),
    /// The total length field disagrees with the length of the buffer.
    #[error("total length field is {declared} but the buffer holds {actual} bytes")]
    LengthMismatch {
        /// The total length found in the header
        declared: u16,
        /// The length of the supplied buffer
        actual: usize,
    },
    /// The header is structurally invalid.
    #[error(transparent)]
    Malformed(#[from] MalformedHeaderError),
}

/// Structural defects of an IPv4 header.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedHeaderError {
    /// The internet header length is below the 5 words of the fixed header.
    #[error("internet header length {0} is below the minimum of 5 words")]
    IhlTooSmall(u8),
    /// The internet header length points past the end of the buffer.
    #[error("header length of {header_len} bytes exceeds the {buffer_len} byte buffer")]
    HeaderExceedsBuffer {
        /// Header length in bytes (IHL * 4)
        header_len: usize,
        /// The length of the supplied buffer
        buffer_len: usize,
    },
}

/// Errors which may occur while encoding an [`Ipv4Header`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ipv4EncodeError {
    /// The options would need an internet header length above 15.
    #[error(transparent)]
    TooManyOptions(TooManyOptionsError),
    /// The packet would not fit the 16-bit total length field.
    #[error("packet of {0} bytes exceeds the maximum ipv4 total length of 65535")]
    TooLong(usize),
    /// The output buffer is too small to hold the packet.
    #[error("output buffer too short: {0}")]
    BufferTooShort(LengthError),
}

impl Ipv4Header {
    /// The length of a header without options
    pub const MIN_LEN: usize = codec::MIN_HEADER_LEN;
    /// The length of a header with the maximum number of options
    pub const MAX_LEN: usize = codec::MAX_HEADER_LEN;

    /// Start building a new header.
    ///
    /// See [`Ipv4HeaderBuilder::new`] for the defaults.
    pub fn builder(
        source: Ipv4Addr,
        destination: Ipv4Addr,
        protocol: Protocol,
    ) -> Ipv4HeaderBuilder {
        Ipv4HeaderBuilder::new(source, destination, protocol)
    }

    /// Decode a buffer holding exactly one IPv4 packet.
    ///
    /// The checksum is stored as found and is not verified.
    ///
    /// # Errors
    ///
    /// * [`Ipv4DecodeError::TooShort`] if the buffer is shorter than 20 bytes.
    /// * [`Ipv4DecodeError::LengthMismatch`] if the total length field is not the buffer length.
    /// * [`Ipv4DecodeError::Malformed`] if the IHL is below 5 or reaches past the buffer.
    pub fn decode(buf: &[u8]) -> Result<Ipv4Header, Ipv4DecodeError> {
        codec::decode(buf)
    }

    /// Encode this header and its payload.
    ///
    /// The IHL and total length are computed from the options and payload.
    /// The stored checksum is written as is.
    ///
    /// # Errors
    ///
    /// * [`Ipv4EncodeError::TooManyOptions`] if there are more than 10 option words.
    /// * [`Ipv4EncodeError::TooLong`] if the packet exceeds 65535 bytes.
    pub fn encode(&self) -> Result<Vec<u8>, Ipv4EncodeError> {
        codec::encode(self)
    }

    /// Compute the header checksum, treating the checksum field as zero.
    ///
    /// # Errors
    ///
    /// Fails for the same reasons as [`Ipv4Header::encode`], since only a header with a wire form
    /// has a checksum.
    pub fn compute_checksum(&self) -> Result<u16, Ipv4EncodeError> {
        codec::header_checksum(self)
    }

    /// Returns true if the stored checksum matches [`Ipv4Header::compute_checksum`].
    ///
    /// Headers without a wire form never verify.
    #[must_use]
    pub fn verify_checksum(&self) -> bool {
        self.compute_checksum()
            .is_ok_and(|computed| computed == self.checksum)
    }

    /// Return a copy of this header with the stored checksum replaced.
    #[must_use]
    pub fn with_checksum(self, checksum: u16) -> Ipv4Header {
        Ipv4Header { checksum, ..self }
    }

    /// Return a copy of this header carrying its correct checksum.
    ///
    /// # Errors
    ///
    /// Fails for the same reasons as [`Ipv4Header::compute_checksum`].
    pub fn with_computed_checksum(self) -> Result<Ipv4Header, Ipv4EncodeError> {
        let checksum = self.compute_checksum()?;
        Ok(self.with_checksum(checksum))
    }

    /// Start a builder holding all the fields of this header.
    pub fn to_builder(&self) -> Ipv4HeaderBuilder {
        Ipv4HeaderBuilder::from(self.clone())
    }

    /// The IP version
    #[must_use]
    pub fn version(&self) -> Version {
        self.version
    }

    /// True if the version field is 4
    #[must_use]
    pub fn is_v4(&self) -> bool {
        self.version == Version::V4
    }

    /// The internet header length in 32-bit words (`5 + options`)
    #[must_use]
    pub fn ihl(&self) -> usize {
        usize::from(codec::MIN_IHL) + self.options.len()
    }

    /// The header length in bytes (`ihl * 4`)
    #[must_use]
    pub fn header_len(&self) -> usize {
        self.ihl() * 4
    }

    /// The length of header and payload in bytes
    #[must_use]
    pub fn total_len(&self) -> usize {
        self.header_len() + self.payload.len()
    }

    /// The differentiated services code point
    #[must_use]
    pub fn dscp(&self) -> Dscp {
        self.dscp
    }

    /// The explicit congestion notification
    #[must_use]
    pub fn ecn(&self) -> Ecn {
        self.ecn
    }

    /// The identification field
    #[must_use]
    pub fn identification(&self) -> u16 {
        self.identification
    }

    /// The flags field
    #[must_use]
    pub fn flags(&self) -> Ipv4Flags {
        self.flags
    }

    /// True if the don't fragment flag is set
    #[must_use]
    pub fn dont_fragment(&self) -> bool {
        self.flags.contains(Ipv4Flags::DONT_FRAGMENT)
    }

    /// True if the more fragments flag is set
    #[must_use]
    pub fn more_fragments(&self) -> bool {
        self.flags.contains(Ipv4Flags::MORE_FRAGMENTS)
    }

    /// The fragment offset
    #[must_use]
    pub fn fragment_offset(&self) -> FragmentOffset {
        self.fragment_offset
    }

    /// The time to live
    #[must_use]
    pub fn ttl(&self) -> u8 {
        self.ttl
    }

    /// The upper layer protocol
    #[must_use]
    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    /// The stored header checksum
    #[must_use]
    pub fn checksum(&self) -> u16 {
        self.checksum
    }

    /// The source address
    #[must_use]
    pub fn source(&self) -> Ipv4Addr {
        self.source
    }

    /// The destination address
    #[must_use]
    pub fn destination(&self) -> Ipv4Addr {
        self.destination
    }

    /// The header options (empty if the IHL is 5)
    #[must_use]
    pub fn options(&self) -> &Ipv4Options {
        &self.options
    }

    /// The payload following the header
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }
}

impl Parse for Ipv4Header {
    type Error = Ipv4DecodeError;

    /// Parse the whole of `buf` as one packet.
    fn parse(buf: &[u8]) -> Result<(Self, NonZero<usize>), Self::Error> {
        let header = codec::decode(buf)?;
        let consumed = NonZero::new(buf.len()).unwrap_or_else(|| unreachable!());
        Ok((header, consumed))
    }
}

impl DeParse for Ipv4Header {
    type Error = Ipv4EncodeError;

    fn size(&self) -> NonZero<usize> {
        NonZero::new(self.total_len()).unwrap_or_else(|| unreachable!())
    }

    fn deparse(&self, buf: &mut [u8]) -> Result<NonZero<usize>, Self::Error> {
        codec::encode_into(self, buf)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Ipv4Header {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("Ipv4Header", 15)?;
        state.serialize_field("version", &self.version)?;
        state.serialize_field("ihl", &self.ihl())?;
        state.serialize_field("dscp", &self.dscp)?;
        state.serialize_field("ecn", &self.ecn)?;
        state.serialize_field("total_len", &self.total_len())?;
        state.serialize_field("identification", &self.identification)?;
        state.serialize_field("flags", &self.flags)?;
        state.serialize_field("fragment_offset", &self.fragment_offset)?;
        state.serialize_field("ttl", &self.ttl)?;
        state.serialize_field("protocol", &self.protocol)?;
        state.serialize_field("checksum", &self.checksum)?;
        state.serialize_field("source", &self.source)?;
        state.serialize_field("destination", &self.destination)?;
        state.serialize_field("options", &self.options)?;
        state.serialize_field("payload", &self.payload)?;
        state.end()
    }
}

#[cfg(any(test, feature = "bolero"))]
mod contract {
    use super::Ipv4Header;
    use bolero::{Driver, TypeGenerator};

    /// The largest payload generated; one ethernet MTU.
    const MAX_GENERATED_PAYLOAD: u16 = 1500;

    /// Only generates headers which have a wire form.
    impl TypeGenerator for Ipv4Header {
        fn generate<D: Driver>(driver: &mut D) -> Option<Self> {
            let payload_len = driver.produce::<u16>()? % (MAX_GENERATED_PAYLOAD + 1);
            let payload = (0..payload_len)
                .map(|_| driver.produce::<u8>())
                .collect::<Option<Vec<_>>>()?;
            Some(Ipv4Header {
                version: driver.produce()?,
                dscp: driver.produce()?,
                ecn: driver.produce()?,
                identification: driver.produce()?,
                flags: driver.produce()?,
                fragment_offset: driver.produce()?,
                ttl: driver.produce()?,
                protocol: driver.produce()?,
                checksum: driver.produce()?,
                source: driver.produce::<u32>()?.into(),
                destination: driver.produce::<u32>()?.into(),
                options: driver.produce()?,
                payload,
            })
        }
    }
}
