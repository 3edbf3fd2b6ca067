// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Process-wide tracing control

use crate::targets::{TRACING_TARGETS, TargetCfg};
use ordermap::OrderMap;
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard, OnceLock};
use tracing::{debug, warn};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{Registry, fmt, reload};

/// Level applied to anything not covered by a target
pub const DEFAULT_DEFAULT_LOGLEVEL: LevelFilter = LevelFilter::INFO;

/// Environment variable holding directives applied at startup
pub const TRACING_ENV_VAR: &str = "OVERPASS_LOG";

/// Errors reported by [`TracingControl`]
#[derive(Debug, thiserror::Error)]
pub enum TraceCtlError {
    /// A directive named neither a target nor a tag
    #[error("unknown tracing target or tag '{0}'")]
    UnknownTarget(String),
    /// A directive carried an unparseable level
    #[error("invalid tracing level '{0}'")]
    InvalidLevel(String),
    /// A directive was not of the form `name=level` or `level`
    #[error("invalid tracing directive '{0}'")]
    InvalidDirective(String),
    /// The filter could not be built or installed
    #[error("failed to apply tracing filter: {0}")]
    Filter(String),
    /// Some thread panicked while holding the control lock
    #[error("tracing control lock is poisoned")]
    Poisoned,
}

#[derive(Debug, Clone)]
pub(crate) struct TargetState {
    pub(crate) cfg: TargetCfg,
    pub(crate) level: LevelFilter,
}

#[derive(Debug, Clone)]
pub(crate) struct ControlState {
    pub(crate) default: LevelFilter,
    pub(crate) targets: OrderMap<&'static str, TargetState>,
}

/// Runtime control over the global tracing subscriber.
///
/// Obtain it with [`get_trace_ctl`].
pub struct TracingControl {
    state: Mutex<ControlState>,
    handle: Option<reload::Handle<EnvFilter, Registry>>,
}

impl ControlState {
    pub(crate) fn new(targets: &[TargetCfg]) -> ControlState {
        let mut map = OrderMap::new();
        for cfg in targets {
            if map.contains_key(cfg.name) {
                warn!("tracing target '{}' is declared more than once", cfg.name);
                continue;
            }
            map.insert(
                cfg.name,
                TargetState {
                    cfg: *cfg,
                    level: cfg.level,
                },
            );
        }
        map.sort_keys();
        ControlState {
            default: DEFAULT_DEFAULT_LOGLEVEL,
            targets: map,
        }
    }

    /// Render the state as [`EnvFilter`] directives.
    pub(crate) fn directives(&self) -> String {
        let mut out = self.default.to_string().to_lowercase();
        for target in self.targets.values() {
            out.push_str(&format!(
                ",{}={}",
                target.cfg.module,
                target.level.to_string().to_lowercase()
            ));
        }
        out
    }

    /// Apply a single `key=level` or `level` directive.
    fn apply(&mut self, directive: &str) -> Result<(), TraceCtlError> {
        let Some((key, level)) = directive.split_once('=') else {
            self.default = parse_level(directive)?;
            return Ok(());
        };
        let key = key.trim();
        let level = parse_level(level)?;
        if let Some(target) = self.targets.get_mut(key) {
            target.level = level;
            return Ok(());
        }
        let mut tagged = self
            .targets
            .values_mut()
            .filter(|t| t.cfg.tags.iter().any(|tag| *tag == key))
            .peekable();
        if tagged.peek().is_none() {
            return Err(TraceCtlError::UnknownTarget(key.to_string()));
        }
        tagged.for_each(|t| t.level = level);
        Ok(())
    }
}

fn parse_level(level: &str) -> Result<LevelFilter, TraceCtlError> {
    LevelFilter::from_str(level.trim()).map_err(|_| TraceCtlError::InvalidLevel(level.to_string()))
}

impl TracingControl {
    fn init() -> TracingControl {
        let state = ControlState::new(&TRACING_TARGETS);
        let filter = EnvFilter::builder()
            .parse(state.directives())
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DEFAULT_LOGLEVEL.to_string()));
        let (filter, handle) = reload::Layer::new(filter);
        let installed = tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .try_init()
            .is_ok();
        let ctl = TracingControl {
            state: Mutex::new(state),
            handle: installed.then_some(handle),
        };
        if !installed {
            debug!("a global subscriber is already installed; levels will not be applied");
        }
        if let Ok(env) = std::env::var(TRACING_ENV_VAR)
            && let Err(e) = ctl.setup_from_string(&env)
        {
            warn!("ignoring {TRACING_ENV_VAR}: {e}");
        }
        ctl
    }

    fn lock(&self) -> Result<MutexGuard<'_, ControlState>, TraceCtlError> {
        self.state.lock().map_err(|_| TraceCtlError::Poisoned)
    }

    fn reload(&self, state: &ControlState) -> Result<(), TraceCtlError> {
        let Some(handle) = &self.handle else {
            return Ok(());
        };
        let filter = EnvFilter::builder()
            .parse(state.directives())
            .map_err(|e| TraceCtlError::Filter(e.to_string()))?;
        handle
            .reload(filter)
            .map_err(|e| TraceCtlError::Filter(e.to_string()))
    }

    /// Set the level used for events outside of any declared target.
    pub fn set_default_level(&self, level: LevelFilter) -> Result<(), TraceCtlError> {
        let mut state = self.lock()?;
        state.default = level;
        self.reload(&state)
    }

    /// Set the level of a single target or of every target carrying a tag.
    pub fn set_level(&self, target: &str, level: LevelFilter) -> Result<(), TraceCtlError> {
        self.setup_from_string(&format!("{target}={level}"))
    }

    /// The current level of the named target, if it exists.
    pub fn get_level(&self, target: &str) -> Result<Option<LevelFilter>, TraceCtlError> {
        Ok(self.lock()?.targets.get(target).map(|t| t.level))
    }

    /// Apply a comma separated list of directives.
    ///
    /// Each directive is `name=level`, `tag=level` or a bare `level` for the default.
    /// Directives are applied in order and none take effect if any of them is invalid.
    pub fn setup_from_string(&self, directives: &str) -> Result<(), TraceCtlError> {
        let mut state = self.lock()?;
        let mut updated = state.clone();
        for directive in directives.split(',').map(str::trim) {
            if directive.is_empty() {
                continue;
            }
            if directive.matches('=').count() > 1 {
                return Err(TraceCtlError::InvalidDirective(directive.to_string()));
            }
            updated.apply(directive)?;
        }
        self.reload(&updated)?;
        *state = updated;
        Ok(())
    }

    /// Render the known targets and their levels.
    pub fn as_string(&self) -> Result<String, TraceCtlError> {
        Ok(self.lock()?.to_string())
    }
}

static TRACE_CTL: OnceLock<TracingControl> = OnceLock::new();

/// Get the process-wide [`TracingControl`], installing the subscriber on first use.
pub fn get_trace_ctl() -> &'static TracingControl {
    TRACE_CTL.get_or_init(TracingControl::init)
}
