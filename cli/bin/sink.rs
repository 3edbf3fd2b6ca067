// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Output sinks writing relayed packets in a readable form

use args::OutputFormat;
use net::Ipv4Header;
use pkt_io::PacketSink;
use std::io::{self, Write};

/// A [`PacketSink`] rendering each packet to a writer.
pub(crate) struct OutputSink<W: Write> {
    format: OutputFormat,
    out: W,
}

impl<W: Write> OutputSink<W> {
    pub(crate) fn new(format: OutputFormat, out: W) -> Self {
        Self { format, out }
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> W {
        self.out
    }
}

fn decode(packet: &[u8]) -> io::Result<Ipv4Header> {
    Ipv4Header::decode(packet).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

impl<W: Write> PacketSink for OutputSink<W> {
    fn send(&mut self, packet: &[u8]) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => write!(self.out, "{}", decode(packet)?),
            OutputFormat::Json => {
                serde_json::to_writer(&mut self.out, &decode(packet)?)?;
                writeln!(self.out)
            }
            OutputFormat::Hex => {
                for byte in packet {
                    write!(self.out, "{byte:02x}")?;
                }
                writeln!(self.out)
            }
        }
    }
}
