// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Command line arguments of the ipv4dump tool

pub use clap::Parser;
use clap::ValueEnum;
use pkt_io::RelayPolicy;
use std::path::PathBuf;
use std::str::FromStr;

/// A raw packet given as hex text on the command line.
///
/// Whitespace and `:` separators are ignored, so `45:00:00:14` and `4500 0014` are both accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexPacket(Vec<u8>);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, miette::Diagnostic)]
pub enum InvalidHexPacket {
    #[error("empty hex packet")]
    Empty,
    #[error("hex packet has an odd number ({0}) of digits")]
    #[diagnostic(help("every byte needs two hex digits"))]
    OddLength(usize),
    #[error("'{digit}' at position {position} is not a hex digit")]
    InvalidDigit { digit: char, position: usize },
}

impl HexPacket {
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.0
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl FromStr for HexPacket {
    type Err = InvalidHexPacket;
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let digits = input
            .char_indices()
            .filter(|(_, c)| !c.is_whitespace() && *c != ':')
            .map(|(position, digit)| {
                digit
                    .to_digit(16)
                    .map(|d| d as u8)
                    .ok_or(InvalidHexPacket::InvalidDigit { digit, position })
            })
            .collect::<Result<Vec<u8>, _>>()?;
        if digits.is_empty() {
            return Err(InvalidHexPacket::Empty);
        }
        if digits.len() % 2 != 0 {
            return Err(InvalidHexPacket::OddLength(digits.len()));
        }
        Ok(HexPacket(
            digits
                .chunks_exact(2)
                .map(|pair| (pair[0] << 4) | pair[1])
                .collect(),
        ))
    }
}

/// How decoded packets are written out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Multi-line field dump
    #[default]
    Text,
    /// One JSON object per packet
    Json,
    /// One line of lowercase hex per packet
    Hex,
}

#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum InvalidCmdArguments {
    #[error("no packets given")]
    #[diagnostic(help("pass --input <PATH> or --hex <HEX> at least once"))]
    NoPackets,
}

#[derive(Parser, Debug)]
#[command(name = "ipv4dump")]
#[command(version)]
#[command(about = "Decode, check and re-encode raw IPv4 packets", long_about = None)]
pub struct CmdArgs {
    #[arg(
        long,
        value_name = "PATH",
        help = "File holding exactly one raw IPv4 packet. May be repeated"
    )]
    input: Vec<PathBuf>,

    #[arg(
        long,
        value_name = "HEX",
        value_parser = HexPacket::from_str,
        help = "Raw IPv4 packet as hex digits; whitespace and ':' are ignored. May be repeated"
    )]
    hex: Vec<HexPacket>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text, help = "Output format")]
    output: OutputFormat,

    #[arg(
        long,
        default_value_t = false,
        help = "Recompute header checksums that do not verify before writing packets out"
    )]
    fix_checksum: bool,

    #[arg(
        long,
        default_value_t = false,
        help = "Drop packets whose header checksum does not verify (ignored with --fix-checksum)"
    )]
    drop_bad_checksum: bool,

    #[arg(
        long,
        default_value_t = false,
        help = "Show configurable tracing targets and exit"
    )]
    show_tracing_targets: bool,

    #[arg(
        long,
        env = "OVERPASS_TRACING",
        value_name = "tracing configuration",
        help = "Tracing config string as comma-separated sequence of target=level or tag=level, with level one in [off,error,warn,info,debug,trace].
A bare level sets the default log-level.
E.g. warn,relay=debug"
    )]
    tracing: Option<String>,
}

impl CmdArgs {
    /// Check that there is something to do.
    pub fn validate(&self) -> Result<(), InvalidCmdArguments> {
        if self.input.is_empty() && self.hex.is_empty() && !self.show_tracing_targets {
            return Err(InvalidCmdArguments::NoPackets);
        }
        Ok(())
    }

    pub fn inputs(&self) -> &[PathBuf] {
        &self.input
    }

    pub fn hex_packets(&self) -> impl Iterator<Item = &[u8]> {
        self.hex.iter().map(HexPacket::bytes)
    }

    pub fn output(&self) -> OutputFormat {
        self.output
    }

    pub fn relay_policy(&self) -> RelayPolicy {
        RelayPolicy {
            fix_checksum: self.fix_checksum,
            drop_bad_checksum: self.drop_bad_checksum,
        }
    }

    pub fn show_tracing_targets(&self) -> bool {
        self.show_tracing_targets
    }

    pub fn tracing(&self) -> Option<&String> {
        self.tracing.as_ref()
    }
}
