// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Raw IPv4 packet I/O around the header codec

#![deny(clippy::all)]

mod file;
mod io;
mod queue;
mod relay;
mod tests;

pub use file::FileSource;
pub use io::{Chain, PacketSink, PacketSource, chain};
pub use queue::MemoryQueue;
pub use relay::{DropReason, Relay, RelayPolicy, RelayStats, Verdict};
