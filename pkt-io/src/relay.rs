// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Move packets from a source to a sink through the IPv4 codec

use crate::io::{PacketSink, PacketSource};
use net::{Ipv4DecodeError, Ipv4EncodeError, Ipv4Header};
use std::fmt::Display;
use std::io;
use tracectl::trace_target;
use tracing::{debug, info, trace};

const RELAY: &str = "relay";
trace_target!(RELAY, LevelFilter::INFO, &["pkt-io"]);

/// What to do about packets whose stored checksum is wrong.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelayPolicy {
    /// Replace bad checksums with the computed one before forwarding.
    pub fix_checksum: bool,
    /// Drop packets with bad checksums. Ignored if `fix_checksum` is set.
    pub drop_bad_checksum: bool,
}

/// Counters kept by a [`Relay`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelayStats {
    /// Packets taken from the source
    pub received: u64,
    /// Packets written to the sink
    pub forwarded: u64,
    /// Packets dropped because they did not decode
    pub malformed: u64,
    /// Packets whose stored checksum was wrong, whatever happened to them
    pub bad_checksum: u64,
    /// Packets forwarded with a recomputed checksum
    pub repaired: u64,
}

/// Why a packet was not forwarded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropReason {
    /// The packet did not decode
    Malformed(Ipv4DecodeError),
    /// The stored checksum was wrong and the policy says to drop
    BadChecksum,
    /// The decoded header could not be encoded again
    Unencodable(Ipv4EncodeError),
}

/// The fate of one packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Forwarded as decoded
    Forwarded,
    /// Forwarded with a recomputed checksum
    Repaired,
    /// Not forwarded
    Dropped(DropReason),
}

impl Display for DropReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DropReason::Malformed(e) => write!(f, "malformed: {e}"),
            DropReason::BadChecksum => write!(f, "bad checksum"),
            DropReason::Unencodable(e) => write!(f, "unencodable: {e}"),
        }
    }
}

impl Display for RelayStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "received: {} forwarded: {} malformed: {} bad-checksum: {} repaired: {}",
            self.received, self.forwarded, self.malformed, self.bad_checksum, self.repaired
        )
    }
}

/// Decodes every packet of a [`PacketSource`], applies a [`RelayPolicy`] and writes what survives
/// to a [`PacketSink`].
pub struct Relay<Src: PacketSource, Snk: PacketSink> {
    source: Src,
    sink: Snk,
    policy: RelayPolicy,
    stats: RelayStats,
}

impl<Src: PacketSource, Snk: PacketSink> Relay<Src, Snk> {
    #[must_use]
    pub fn new(source: Src, sink: Snk, policy: RelayPolicy) -> Self {
        Self {
            source,
            sink,
            policy,
            stats: RelayStats::default(),
        }
    }

    #[must_use]
    pub fn stats(&self) -> RelayStats {
        self.stats
    }

    #[must_use]
    pub fn policy(&self) -> RelayPolicy {
        self.policy
    }

    /// Consume the relay, returning the sink.
    pub fn into_sink(self) -> Snk {
        self.sink
    }

    /// Decide the fate of a single packet, without touching the sink.
    ///
    /// Returns the bytes to forward, if any.
    fn judge(&mut self, packet: &[u8]) -> (Verdict, Option<Vec<u8>>) {
        let header = match Ipv4Header::decode(packet) {
            Ok(header) => header,
            Err(e) => {
                self.stats.malformed += 1;
                return (Verdict::Dropped(DropReason::Malformed(e)), None);
            }
        };
        if header.verify_checksum() {
            return (Verdict::Forwarded, Some(packet.to_vec()));
        }
        self.stats.bad_checksum += 1;
        if self.policy.fix_checksum {
            return match header
                .with_computed_checksum()
                .and_then(|header| header.encode())
            {
                Ok(bytes) => {
                    self.stats.repaired += 1;
                    (Verdict::Repaired, Some(bytes))
                }
                Err(e) => (Verdict::Dropped(DropReason::Unencodable(e)), None),
            };
        }
        if self.policy.drop_bad_checksum {
            return (Verdict::Dropped(DropReason::BadChecksum), None);
        }
        (Verdict::Forwarded, Some(packet.to_vec()))
    }

    /// Relay a single packet.
    ///
    /// # Errors
    ///
    /// Fails only if the sink fails; bad packets are dropped, not reported as errors.
    pub fn process(&mut self, packet: &[u8]) -> io::Result<Verdict> {
        self.stats.received += 1;
        let (verdict, out) = self.judge(packet);
        match (&verdict, out) {
            (_, Some(bytes)) => {
                self.sink.send(&bytes)?;
                self.stats.forwarded += 1;
                trace!("forwarded {} byte packet ({verdict:?})", bytes.len());
            }
            (Verdict::Dropped(reason), None) => {
                debug!("dropping packet #{}: {reason}", self.stats.received);
            }
            (_, None) => {}
        }
        Ok(verdict)
    }

    /// Relay packets until the source is exhausted.
    ///
    /// # Errors
    ///
    /// Stops at the first I/O error of either the source or the sink.
    pub fn run(&mut self) -> io::Result<RelayStats> {
        while let Some(packet) = self.source.recv()? {
            self.process(&packet)?;
        }
        info!("relay done: {}", self.stats);
        Ok(self.stats)
    }
}
