// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Field types shared by the IP family of headers.

pub mod dscp;
pub mod ecn;
pub mod protocol;

pub use dscp::{Dscp, InvalidDscpError};
pub use ecn::{Ecn, InvalidEcnError};
pub use protocol::Protocol;
