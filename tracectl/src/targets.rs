// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Registry of the tracing targets declared across the workspace

use linkme::distributed_slice;
use tracing_subscriber::filter::LevelFilter;

/// A named tracing target.
///
/// A target maps a short, stable name (used on the command line) to the module path whose events it
/// controls, together with the level it starts at.
#[derive(Debug, Clone, Copy)]
pub struct TargetCfg {
    /// Name used in directives, e.g. `relay=debug`
    pub name: &'static str,
    /// Module path the directive applies to
    pub module: &'static str,
    /// Level used unless overridden
    pub level: LevelFilter,
    /// Tags to set several targets at once
    pub tags: &'static [&'static str],
}

/// All targets declared with [`trace_target!`](crate::trace_target).
#[distributed_slice]
pub static TRACING_TARGETS: [TargetCfg];

/// Declare a tracing target for the calling module.
///
/// ```ignore
/// use tracectl::trace_target;
/// trace_target!("relay", LevelFilter::INFO, &["pkt-io"]);
/// ```
///
/// At most one target may be declared per module.
#[macro_export]
macro_rules! trace_target {
    ($name:expr, $level:expr, $tags:expr) => {
        #[$crate::linkme::distributed_slice($crate::targets::TRACING_TARGETS)]
        #[linkme(crate = $crate::linkme)]
        static TRACING_TARGET: $crate::targets::TargetCfg = {
            #[allow(unused_imports)]
            use $crate::LevelFilter;
            $crate::targets::TargetCfg {
                name: $name,
                module: module_path!(),
                level: $level,
                tags: $tags,
            }
        };
    };
}
