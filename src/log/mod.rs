//! Diagnostic logging. Logging describes what the simulator is doing internally and is
//! separate from _reporting_, which presents results (see [`crate::report`]).
//!
//! Logging is off until a [`LogSpec`] is installed with [`configure`]. A spec is written
//! the way `--log-level` takes it: a bare level sets the global filter, and
//! `module=level` pairs set per-module filters. When only module filters are given the
//! global filter is `error`, so errors from everywhere stay visible.
//!
//! ```rust
//! use vaccinate::log::{configure, LevelFilter, LogSpec};
//!
//! let spec: LogSpec = "warn,vaccinate::contact=trace".parse().unwrap();
//! assert_eq!(spec.global, LevelFilter::Warn);
//! assert_eq!(spec.level_for("vaccinate::contact"), LevelFilter::Trace);
//! configure(&spec);
//! ```
#[cfg(feature = "logging")]
mod standard_logger;

#[cfg(not(feature = "logging"))]
mod null_logger;

use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::{LazyLock, Mutex, MutexGuard};

pub use log::{debug, error, info, trace, warn, LevelFilter};

#[cfg(not(feature = "logging"))]
use null_logger::Backend;
#[cfg(feature = "logging")]
use standard_logger::Backend;

use crate::error::VaccinateError;

// `rustyline` logs every keystroke.
const QUIET_MODULES: [&str; 1] = ["rustyline"];

/// The installed logger. Loggers are process-wide, so there is only ever one.
static BACKEND: LazyLock<Mutex<Backend>> = LazyLock::new(Mutex::default);

/// A global level filter plus per-module overrides.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogSpec {
    pub global: LevelFilter,
    pub modules: BTreeMap<String, LevelFilter>,
}

impl Default for LogSpec {
    /// Everything off.
    fn default() -> Self {
        LogSpec {
            global: LevelFilter::Off,
            modules: QUIET_MODULES
                .iter()
                .map(|module| ((*module).to_string(), LevelFilter::Off))
                .collect(),
        }
    }
}

impl LogSpec {
    /// The effective filter for `module`: the longest matching module prefix wins,
    /// falling back to the global filter.
    pub fn level_for(&self, module: &str) -> LevelFilter {
        self.modules
            .iter()
            .filter(|(prefix, _)| {
                module == prefix.as_str()
                    || module
                        .strip_prefix(prefix.as_str())
                        .is_some_and(|rest| rest.starts_with("::"))
            })
            .max_by_key(|(prefix, _)| prefix.len())
            .map_or(self.global, |(_, level)| *level)
    }

    /// The most verbose level any message can pass with.
    pub fn max_level(&self) -> LevelFilter {
        self.modules
            .values()
            .copied()
            .fold(self.global, Ord::max)
    }
}

fn parse_level(level: &str) -> Result<LevelFilter, VaccinateError> {
    level
        .trim()
        .parse()
        .map_err(|_| VaccinateError::VaccinateError(format!("invalid log level: {level}")))
}

impl FromStr for LogSpec {
    type Err = VaccinateError;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let mut parsed = LogSpec::default();
        let mut global = None;
        for part in spec.split(',').filter(|part| !part.trim().is_empty()) {
            match part.split_once('=') {
                Some((module, level)) => {
                    parsed
                        .modules
                        .insert(module.trim().to_string(), parse_level(level)?);
                }
                None => global = Some(parse_level(part)?),
            }
        }
        parsed.global = global.unwrap_or(LevelFilter::Error);
        Ok(parsed)
    }
}

fn backend() -> MutexGuard<'static, Backend> {
    // A panic while holding the lock leaves the backend usable.
    BACKEND
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// Installs `spec` as the process-wide logging configuration, replacing any earlier one.
pub fn configure(spec: &LogSpec) {
    backend().apply(spec);
}
