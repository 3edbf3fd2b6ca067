// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Decode, check and re-encode raw IPv4 packets

#![deny(clippy::all, clippy::pedantic)]

mod sink;

use crate::sink::OutputSink;
use args::{CmdArgs, Parser};
use miette::{Context, IntoDiagnostic};
use pkt_io::{FileSource, MemoryQueue, Relay, RelayStats, chain};
use std::io::Write;
use tracectl::{get_trace_ctl, trace_target};
use tracing::{debug, info};

trace_target!("ipv4dump", LevelFilter::INFO, &[]);

/// Apply tracing options. Returns true if the process should exit.
fn process_tracing_cmds(args: &CmdArgs) -> miette::Result<bool> {
    let tctl = get_trace_ctl();
    if let Some(tracing) = args.tracing() {
        tctl.setup_from_string(tracing)
            .into_diagnostic()
            .wrap_err("Invalid tracing configuration")?;
    }
    if args.show_tracing_targets() {
        let out = tctl.as_string().unwrap_or_else(|e| e.to_string());
        println!("{out}");
        return Ok(true);
    }
    Ok(false)
}

/// Relay every packet named by `args` into `out`.
///
/// # Errors
///
/// Fails on invalid arguments, on I/O errors, and if any packet was dropped as malformed.
fn run(args: &CmdArgs, out: impl Write) -> miette::Result<RelayStats> {
    args.validate()?;

    let hex: MemoryQueue = args.hex_packets().collect();
    let files = FileSource::new(args.inputs());
    debug!(
        "relaying {} hex and {} file packets with {:?}",
        hex.len(),
        args.inputs().len(),
        args.relay_policy()
    );

    let sink = OutputSink::new(args.output(), out);
    let mut relay = Relay::new(chain(hex, files), sink, args.relay_policy());
    let stats = relay
        .run()
        .into_diagnostic()
        .wrap_err("Packet relay failed")?;

    eprintln!("{stats}");
    if stats.malformed > 0 {
        miette::bail!("{} malformed packet(s) dropped", stats.malformed);
    }
    Ok(stats)
}

fn main() -> miette::Result<()> {
    let args = CmdArgs::parse();
    if process_tracing_cmds(&args)? {
        return Ok(());
    }
    run(&args, std::io::stdout().lock())?;
    info!("done");
    Ok(())
}
