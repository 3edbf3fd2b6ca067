// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The [internet checksum] used by the IPv4 header.
//!
//! [internet checksum]: https://datatracker.ietf.org/doc/html/rfc1071

/// Sum `bytes` as big-endian 16-bit words with end-around carry.
///
/// An odd trailing byte is treated as the high byte of a zero-padded word.
/// The result is folded to 16 bits but is _not_ complemented.
#[must_use]
pub fn ones_complement_sum(bytes: &[u8]) -> u16 {
    let mut words = bytes.chunks_exact(2);
    let mut sum: u64 = words
        .by_ref()
        .map(|word| u64::from(u16::from_be_bytes([word[0], word[1]])))
        .sum();
    if let [last] = words.remainder() {
        sum += u64::from(*last) << 8;
    }
    while sum > 0xffff {
        sum = (sum & 0xffff) + (sum >> 16);
    }
    #[allow(clippy::cast_possible_truncation)] // folded to 16 bits above
    let sum = sum as u16;
    sum
}

/// Compute the internet checksum of `bytes`.
///
/// This is the one's complement of [`ones_complement_sum`].
/// To checksum an IPv4 header, pass the header bytes with the checksum field zeroed.
#[must_use]
pub fn internet_checksum(bytes: &[u8]) -> u16 {
    !ones_complement_sum(bytes)
}

/// Returns true if `header` (checksum field included, as found on the wire) sums to `0xffff`.
///
/// This is the receiver side check of RFC 1071 and needs no knowledge of where the checksum
/// field lives.
#[must_use]
pub fn header_checksum_ok(header: &[u8]) -> bool {
    ones_complement_sum(header) == 0xffff
}
