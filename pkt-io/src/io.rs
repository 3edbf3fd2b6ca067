// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The boundary between the codec and whatever moves raw packets

use std::io;

/// Something that yields complete raw IPv4 packets, one per call.
///
/// Framing is the source's job: every buffer returned is exactly one packet, the way a read on a
/// tunnel device returns one packet.
pub trait PacketSource {
    /// Get the next packet, or `None` once the source is exhausted.
    ///
    /// # Errors
    ///
    /// Fails if the underlying device or file can not be read.
    fn recv(&mut self) -> io::Result<Option<Vec<u8>>>;
}

/// Something that accepts complete raw IPv4 packets, one per call.
pub trait PacketSink {
    /// Write one packet.
    ///
    /// # Errors
    ///
    /// Fails if the underlying device or writer rejects the packet.
    fn send(&mut self, packet: &[u8]) -> io::Result<()>;
}

impl<S: PacketSource + ?Sized> PacketSource for Box<S> {
    fn recv(&mut self) -> io::Result<Option<Vec<u8>>> {
        (**self).recv()
    }
}

impl<S: PacketSink + ?Sized> PacketSink for Box<S> {
    fn send(&mut self, packet: &[u8]) -> io::Result<()> {
        (**self).send(packet)
    }
}

/// A [`PacketSource`] draining one source, then another. See [`chain`].
#[derive(Debug)]
pub struct Chain<A, B> {
    first: Option<A>,
    second: B,
}

/// Yield every packet of `first`, then every packet of `second`.
pub fn chain<A: PacketSource, B: PacketSource>(first: A, second: B) -> Chain<A, B> {
    Chain {
        first: Some(first),
        second,
    }
}

impl<A: PacketSource, B: PacketSource> PacketSource for Chain<A, B> {
    fn recv(&mut self) -> io::Result<Option<Vec<u8>>> {
        if let Some(first) = &mut self.first {
            if let Some(packet) = first.recv()? {
                return Ok(Some(packet));
            }
            self.first = None;
        }
        self.second.recv()
    }
}
