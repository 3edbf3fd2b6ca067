// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! A library for decoding, validating and encoding IPv4 headers

#![deny(
    unsafe_code,
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic
)]
#![allow(clippy::should_panic_without_expect)] // we panic in contract checks with simple unwrap()

pub mod checksum;
pub mod ip;
pub mod ipv4;
pub mod parse;

pub use ipv4::{Ipv4DecodeError, Ipv4EncodeError, Ipv4Header, Ipv4HeaderBuilder};
pub use parse::{DeParse, Parse};
