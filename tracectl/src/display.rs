// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Display of the tracing configuration

use crate::control::ControlState;
use std::fmt::Display;

macro_rules! TARGET_FMT {
    ($name:expr, $level:expr, $tags:expr, $module:expr) => {
        format_args!(" {:<20} {:<6} {:<24} {}", $name, $level, $tags, $module)
    };
}

impl Display for ControlState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, " ━━━━━━━━━━ Tracing targets ━━━━━━━━━━")?;
        writeln!(f, "{}", TARGET_FMT!("target", "level", "tags", "module"))?;
        writeln!(f, "{}", TARGET_FMT!("(default)", self.default, "", ""))?;
        for target in self.targets.values() {
            writeln!(
                f,
                "{}",
                TARGET_FMT!(
                    target.cfg.name,
                    target.level,
                    target.cfg.tags.join(","),
                    target.cfg.module
                )
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use crate::control::ControlState;
    use crate::targets::TargetCfg;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn lists_targets_with_tags() {
        let state = ControlState::new(&[TargetCfg {
            name: "relay",
            module: "overpass_pkt_io::relay",
            level: LevelFilter::DEBUG,
            tags: &["packets", "io"],
        }]);
        let out = state.to_string();
        assert!(out.contains("(default)"));
        let line = out.lines().find(|l| l.contains("relay ")).unwrap();
        assert!(line.contains("packets,io"));
        assert!(line.contains("overpass_pkt_io::relay"));
    }
}
