// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Cross-check the codec against etherparse's independent IPv4 implementation.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use etherparse::{IpDscp, IpEcn, IpFragOffset, IpNumber, Ipv4HeaderSlice};
use overpass_net::ip::{Dscp, Ecn, Protocol};
use overpass_net::ipv4::{FragmentOffset, Ipv4Flags};
use overpass_net::{Ipv4Header, Parse};
use std::net::Ipv4Addr;

#[derive(Debug, Clone, bolero::TypeGenerator)]
struct Fields {
    dscp: u8,
    ecn: u8,
    identification: u16,
    dont_fragment: bool,
    more_fragments: bool,
    fragment_offset: u16,
    ttl: u8,
    protocol: u8,
    source: u32,
    destination: u32,
    option_words: u8,
    payload_len: u16,
}

impl Fields {
    fn header(&self) -> Ipv4Header {
        let mut flags = Ipv4Flags::empty();
        flags.set(Ipv4Flags::DONT_FRAGMENT, self.dont_fragment);
        flags.set(Ipv4Flags::MORE_FRAGMENTS, self.more_fragments);
        let options: Vec<u32> = (0..u32::from(self.option_words % 11))
            .map(|i| 0x0101_0101 * (i + 1))
            .collect();
        Ipv4Header::builder(
            Ipv4Addr::from(self.source),
            Ipv4Addr::from(self.destination),
            Protocol::new(self.protocol),
        )
        .dscp(Dscp::new(self.dscp & 0x3f).unwrap())
        .ecn(Ecn::new(self.ecn & 0b11).unwrap())
        .identification(self.identification)
        .flags(flags)
        .fragment_offset(FragmentOffset::new(self.fragment_offset & 0x1fff).unwrap())
        .ttl(self.ttl)
        .options(options)
        .payload(vec![0xa5; usize::from(self.payload_len % 1501)])
        .build()
        .unwrap()
    }
}

#[test]
fn etherparse_reads_what_we_write() {
    bolero::check!()
        .with_type()
        .cloned()
        .for_each(|fields: Fields| {
            let header = fields.header().with_computed_checksum().unwrap();
            let encoded = header.encode().unwrap();
            let theirs = Ipv4HeaderSlice::from_slice(&encoded).unwrap().to_header();

            assert_eq!(theirs.dscp.value(), header.dscp().value());
            assert_eq!(theirs.ecn.value(), header.ecn().value());
            assert_eq!(usize::from(theirs.total_len), header.total_len());
            assert_eq!(theirs.identification, header.identification());
            assert_eq!(theirs.dont_fragment, header.dont_fragment());
            assert_eq!(theirs.more_fragments, header.more_fragments());
            assert_eq!(theirs.fragment_offset.value(), header.fragment_offset().value());
            assert_eq!(theirs.time_to_live, header.ttl());
            assert_eq!(theirs.protocol.0, header.protocol().value());
            assert_eq!(theirs.source, header.source().octets());
            assert_eq!(theirs.destination, header.destination().octets());
            assert_eq!(theirs.options.len(), header.options().byte_len());
            assert_eq!(theirs.header_checksum, header.checksum());
            assert_eq!(theirs.calc_header_checksum(), header.compute_checksum().unwrap());
        });
}

#[test]
fn we_read_what_etherparse_writes() {
    let payload = b"an opaque payload";
    let mut theirs = etherparse::Ipv4Header::new(
        u16::try_from(payload.len()).unwrap(),
        17,
        IpNumber::UDP,
        [172, 16, 0, 1],
        [172, 16, 0, 254],
    )
    .unwrap();
    theirs.identification = 0x4242;
    theirs.dont_fragment = true;
    theirs.dscp = IpDscp::try_new(10).unwrap();
    theirs.ecn = IpEcn::try_new(1).unwrap();
    theirs.fragment_offset = IpFragOffset::ZERO;
    theirs.header_checksum = theirs.calc_header_checksum();

    let mut buf = Vec::new();
    theirs.write(&mut buf).unwrap();
    buf.extend_from_slice(payload);

    let (ours, consumed) = Ipv4Header::parse(&buf).unwrap();
    assert_eq!(consumed.get(), buf.len());
    assert!(ours.is_v4());
    assert_eq!(ours.ihl(), 5);
    assert_eq!(ours.dscp().value(), 10);
    assert_eq!(ours.ecn().value(), 1);
    assert_eq!(ours.identification(), 0x4242);
    assert!(ours.dont_fragment());
    assert!(!ours.more_fragments());
    assert_eq!(ours.ttl(), 17);
    assert_eq!(ours.protocol(), Protocol::UDP);
    assert_eq!(ours.source(), Ipv4Addr::new(172, 16, 0, 1));
    assert_eq!(ours.destination(), Ipv4Addr::new(172, 16, 0, 254));
    assert_eq!(ours.payload(), payload);
    assert!(ours.verify_checksum());
    assert_eq!(ours.encode().unwrap(), buf);
}
