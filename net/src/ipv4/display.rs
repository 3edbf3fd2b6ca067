// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Display implementations for the IPv4 header

use std::fmt::Display;

use crate::ipv4::Ipv4Header;
use crate::ipv4::fields::{FragmentOffset, Ipv4Flags, Version};
use crate::ipv4::options::Ipv4Options;

macro_rules! IPV4_FIELD {
    ($name:expr, $value:expr) => {
        format_args!("  {:<16}: {}", $name, $value)
    };
}

impl Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value())
    }
}

impl Display for Ipv4Flags {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#05b}", self.bits())?;
        if self.contains(Ipv4Flags::DONT_FRAGMENT) {
            write!(f, " DF")?;
        }
        if self.contains(Ipv4Flags::MORE_FRAGMENTS) {
            write!(f, " MF")?;
        }
        if self.contains(Ipv4Flags::RESERVED) {
            write!(f, " reserved")?;
        }
        Ok(())
    }
}

impl Display for FragmentOffset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value())
    }
}

impl Display for Ipv4Options {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "(none)");
        }
        let mut words = self.words().iter();
        if let Some(first) = words.next() {
            write!(f, "{first:#010x}")?;
        }
        for word in words {
            write!(f, " {word:#010x}")?;
        }
        Ok(())
    }
}

impl Display for Ipv4Header {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, " ━━━━━━━━━━ IPv4 header ━━━━━━━━━━")?;
        writeln!(f, "{}", IPV4_FIELD!("version", self.version()))?;
        writeln!(f, "{}", IPV4_FIELD!("ihl", self.ihl()))?;
        writeln!(f, "{}", IPV4_FIELD!("dscp", self.dscp()))?;
        writeln!(f, "{}", IPV4_FIELD!("ecn", self.ecn()))?;
        writeln!(f, "{}", IPV4_FIELD!("total length", self.total_len()))?;
        writeln!(f, "{}", IPV4_FIELD!("identification", self.identification()))?;
        writeln!(f, "{}", IPV4_FIELD!("flags", self.flags()))?;
        writeln!(f, "{}", IPV4_FIELD!("fragment offset", self.fragment_offset()))?;
        writeln!(f, "{}", IPV4_FIELD!("ttl", self.ttl()))?;
        writeln!(f, "{}", IPV4_FIELD!("protocol", self.protocol()))?;
        writeln!(
            f,
            "{}",
            IPV4_FIELD!("checksum", format_args!("{:#06x}", self.checksum()))
        )?;
        writeln!(f, "{}", IPV4_FIELD!("source", self.source()))?;
        writeln!(f, "{}", IPV4_FIELD!("destination", self.destination()))?;
        writeln!(f, "{}", IPV4_FIELD!("options", self.options()))?;
        writeln!(
            f,
            "{}",
            IPV4_FIELD!("payload", format_args!("{} bytes", self.payload().len()))
        )
    }
}
