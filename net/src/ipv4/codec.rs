// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The IPv4 header wire layout ([RFC 791 section 3.1]).
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |Version|  IHL  |   DSCP    |ECN|          Total Length         |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |         Identification        |Flags|      Fragment Offset    |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |  Time to Live |    Protocol   |         Header Checksum       |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                       Source Address                          |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                    Destination Address                        |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |              Options (IHL - 5 words)          ...             |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! The layout is unpacked in [`decode`] and packed in [`write_header`], and nowhere else.
//!
//! [RFC 791 section 3.1]: https://datatracker.ietf.org/doc/html/rfc791#section-3.1

use crate::checksum::internet_checksum;
use crate::ip::{Dscp, Ecn, Protocol};
use crate::ipv4::fields::{FragmentOffset, Ipv4Flags, Version};
use crate::ipv4::options::{Ipv4Options, TooManyOptionsError};
use crate::ipv4::{Ipv4DecodeError, Ipv4EncodeError, Ipv4Header, MalformedHeaderError};
use crate::parse::LengthError;
use core::net::Ipv4Addr;
use core::num::NonZero;
use tracing::trace;

/// Length of the fixed part of the header, which is also the shortest legal header.
pub(crate) const MIN_HEADER_LEN: usize = 20;
/// Length of a header with the maximum IHL of 15.
pub(crate) const MAX_HEADER_LEN: usize = 60;
/// The IHL of a header without options.
pub(crate) const MIN_IHL: u8 = 5;

#[allow(clippy::unwrap_used)] // safe due to const eval
const MIN_HEADER_LEN_NZ: NonZero<usize> = NonZero::new(MIN_HEADER_LEN).unwrap();

/// Decode a buffer holding exactly one IPv4 packet.
pub(crate) fn decode(buf: &[u8]) -> Result<Ipv4Header, Ipv4DecodeError> {
    decode_unlogged(buf).inspect_err(|err| trace!("rejecting ipv4 header: {err}"))
}

fn decode_unlogged(buf: &[u8]) -> Result<Ipv4Header, Ipv4DecodeError> {
    let Some(fixed) = buf.first_chunk::<MIN_HEADER_LEN>() else {
        return Err(Ipv4DecodeError::TooShort(LengthError {
            expected: MIN_HEADER_LEN_NZ,
            actual: buf.len(),
        }));
    };

    let total_len = u16::from_be_bytes([fixed[2], fixed[3]]);
    if usize::from(total_len) != buf.len() {
        return Err(Ipv4DecodeError::LengthMismatch {
            declared: total_len,
            actual: buf.len(),
        });
    }

    let ihl = fixed[0] & 0x0f;
    if ihl < MIN_IHL {
        return Err(MalformedHeaderError::IhlTooSmall(ihl).into());
    }
    let header_len = usize::from(ihl) * 4;
    if header_len > buf.len() {
        return Err(MalformedHeaderError::HeaderExceedsBuffer {
            header_len,
            buffer_len: buf.len(),
        }
        .into());
    }

    let options = buf[MIN_HEADER_LEN..header_len]
        .chunks_exact(4)
        .map(|word| u32::from_be_bytes([word[0], word[1], word[2], word[3]]))
        .collect::<Ipv4Options>();

    Ok(Ipv4Header {
        version: Version::new(fixed[0] >> 4).unwrap_or_else(|_| unreachable!()),
        dscp: Dscp::new(fixed[1] >> 2).unwrap_or_else(|_| unreachable!()),
        ecn: Ecn::new(fixed[1] & 0b11).unwrap_or_else(|_| unreachable!()),
        identification: u16::from_be_bytes([fixed[4], fixed[5]]),
        flags: Ipv4Flags::new(fixed[6] >> 5).unwrap_or_else(|_| unreachable!()),
        fragment_offset: FragmentOffset::new(u16::from_be_bytes([fixed[6] & 0x1f, fixed[7]]))
            .unwrap_or_else(|_| unreachable!()),
        ttl: fixed[8],
        protocol: Protocol::new(fixed[9]),
        checksum: u16::from_be_bytes([fixed[10], fixed[11]]),
        source: Ipv4Addr::new(fixed[12], fixed[13], fixed[14], fixed[15]),
        destination: Ipv4Addr::new(fixed[16], fixed[17], fixed[18], fixed[19]),
        options,
        payload: buf[header_len..].to_vec(),
    })
}

/// The length fields of a header, derived from its options and payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct WireLengths {
    pub(crate) ihl: u8,
    pub(crate) header_len: usize,
    pub(crate) total_len: u16,
}

impl WireLengths {
    pub(crate) fn of(header: &Ipv4Header) -> Result<WireLengths, Ipv4EncodeError> {
        header
            .options
            .check_fits()
            .map_err(Ipv4EncodeError::TooManyOptions)?;
        let header_len = MIN_HEADER_LEN + header.options.byte_len();
        let total = header_len + header.payload.len();
        let total_len = u16::try_from(total).map_err(|_| Ipv4EncodeError::TooLong(total))?;
        let ihl = u8::try_from(header_len / 4).map_err(|_| {
            Ipv4EncodeError::TooManyOptions(TooManyOptionsError {
                words: header.options.len(),
            })
        })?;
        Ok(WireLengths {
            ihl,
            header_len,
            total_len,
        })
    }
}

/// Pack the header region (fixed part and options) of `header` into `out`.
///
/// `checksum` is written in place of the stored checksum so that the same packing serves both
/// encoding and checksum computation.
/// `out` must be exactly `lengths.header_len` bytes long.
fn write_header(header: &Ipv4Header, lengths: WireLengths, checksum: u16, out: &mut [u8]) {
    debug_assert_eq!(out.len(), lengths.header_len);
    out[0] = (header.version.value() << 4) | (lengths.ihl & 0x0f);
    out[1] = (header.dscp.value() << 2) | (header.ecn.value() & 0b11);
    out[2..4].copy_from_slice(&lengths.total_len.to_be_bytes());
    out[4..6].copy_from_slice(&header.identification.to_be_bytes());
    let flags_and_offset = (u16::from(header.flags.bits()) << 13)
        | (header.fragment_offset.value() & FragmentOffset::MAX_U16);
    out[6..8].copy_from_slice(&flags_and_offset.to_be_bytes());
    out[8] = header.ttl;
    out[9] = header.protocol.value();
    out[10..12].copy_from_slice(&checksum.to_be_bytes());
    out[12..16].copy_from_slice(&header.source.octets());
    out[16..20].copy_from_slice(&header.destination.octets());
    for (slot, word) in out[MIN_HEADER_LEN..]
        .chunks_exact_mut(4)
        .zip(header.options.words())
    {
        slot.copy_from_slice(&word.to_be_bytes());
    }
}

/// Encode `header` (with its stored checksum) to the front of `buf`.
pub(crate) fn encode_into(
    header: &Ipv4Header,
    buf: &mut [u8],
) -> Result<NonZero<usize>, Ipv4EncodeError> {
    let lengths = WireLengths::of(header)?;
    let total = NonZero::new(usize::from(lengths.total_len)).unwrap_or_else(|| unreachable!());
    if buf.len() < total.get() {
        return Err(Ipv4EncodeError::BufferTooShort(LengthError {
            expected: total,
            actual: buf.len(),
        }));
    }
    let (head, payload) = buf[..total.get()].split_at_mut(lengths.header_len);
    write_header(header, lengths, header.checksum, head);
    payload.copy_from_slice(&header.payload);
    Ok(total)
}

/// Encode `header` (with its stored checksum) into a new buffer.
pub(crate) fn encode(header: &Ipv4Header) -> Result<Vec<u8>, Ipv4EncodeError> {
    let lengths = WireLengths::of(header)?;
    let mut out = vec![0; usize::from(lengths.total_len)];
    encode_into(header, &mut out)?;
    Ok(out)
}

/// Checksum the header region of `header` with the checksum field zeroed.
pub(crate) fn header_checksum(header: &Ipv4Header) -> Result<u16, Ipv4EncodeError> {
    let lengths = WireLengths::of(header)?;
    let mut scratch = [0; MAX_HEADER_LEN];
    let region = &mut scratch[..lengths.header_len];
    write_header(header, lengths, 0, region);
    Ok(internet_checksum(region))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod test {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    #[traced_test]
    fn rejected_input_is_traced() {
        assert!(decode(&[0x45; 8]).is_err());
        assert!(logs_contain("rejecting ipv4 header"));
    }

    #[test]
    fn checksum_field_is_zeroed_in_scratch_region() {
        let header = decode(&[
            0x45, 0x00, 0x00, 0x14, 0x00, 0x00, 0x00, 0x00, 0x40, 0x06, 0xff, 0xff, 0x0a, 0x00,
            0x00, 0x01, 0x0a, 0x00, 0x00, 0x02,
        ])
        .unwrap();
        let zeroed = header.clone().with_checksum(0);
        assert_eq!(
            header_checksum(&header).unwrap(),
            header_checksum(&zeroed).unwrap()
        );
    }

    #[test]
    fn wire_lengths_of_minimal_header() {
        let header = decode(&[
            0x45, 0x00, 0x00, 0x14, 0x00, 0x00, 0x00, 0x00, 0x40, 0x06, 0x00, 0x00, 0x0a, 0x00,
            0x00, 0x01, 0x0a, 0x00, 0x00, 0x02,
        ])
        .unwrap();
        assert_eq!(
            WireLengths::of(&header).unwrap(),
            WireLengths {
                ihl: 5,
                header_len: 20,
                total_len: 20
            }
        );
    }
}
