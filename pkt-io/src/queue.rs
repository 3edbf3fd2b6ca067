// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! An in-memory packet queue

use crate::io::{PacketSink, PacketSource};
use std::collections::VecDeque;
use std::io;

/// FIFO of raw packets usable as both a [`PacketSource`] and a [`PacketSink`].
#[derive(Debug, Clone, Default)]
pub struct MemoryQueue {
    packets: VecDeque<Vec<u8>>,
}

impl MemoryQueue {
    /// An empty queue
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a packet at the back.
    pub fn push(&mut self, packet: impl Into<Vec<u8>>) {
        self.packets.push_back(packet.into());
    }

    /// Take the packet at the front.
    pub fn pop(&mut self) -> Option<Vec<u8>> {
        self.packets.pop_front()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.packets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.packets.is_empty()
    }

    /// Iterate over the queued packets front to back.
    pub fn iter(&self) -> impl Iterator<Item = &[u8]> {
        self.packets.iter().map(Vec::as_slice)
    }
}

impl<P: Into<Vec<u8>>> FromIterator<P> for MemoryQueue {
    fn from_iter<T: IntoIterator<Item = P>>(iter: T) -> Self {
        MemoryQueue {
            packets: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl PacketSource for MemoryQueue {
    fn recv(&mut self) -> io::Result<Option<Vec<u8>>> {
        Ok(self.pop())
    }
}

impl PacketSink for MemoryQueue {
    fn send(&mut self, packet: &[u8]) -> io::Result<()> {
        self.push(packet);
        Ok(())
    }
}
