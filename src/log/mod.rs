//! Where the crate's log messages go. Logging describes what the engine is doing; it is not to
//! be confused with _reporting_ (see `crate::report`), which records model output.
//!
//! The engine logs resets and halts at `info`, every step at `debug`, and individual
//! infections and recoveries at `trace`. Nothing is printed until a [`LogSpec`] is applied,
//! normally from the runner's `--log-level` argument:
//!
//! ```rust
//! use spatial_sir::log::apply_log_spec;
//!
//! // `info` everywhere, and every infection and recovery.
//! apply_log_spec("info,spatial_sir::infection=trace").unwrap();
//! ```
//!
//! Specs accumulate: a later spec overrides the global level only if it names one, and
//! replaces the filters of the modules it names while keeping the others.
#[cfg(feature = "logging")]
mod standard_logger;
#[cfg(feature = "logging")]
use standard_logger::Backend;

#[cfg(not(feature = "logging"))]
mod null_logger;
#[cfg(not(feature = "logging"))]
use null_logger::Backend;

pub use log::LevelFilter;
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::{LazyLock, Mutex, MutexGuard};

use crate::error::SirError;

/// A set of level filters: an optional global level plus per-module levels keyed by module
/// path (e.g. `"spatial_sir::engine"`). Modules without a filter use the global level, and a
/// missing global level means `off`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogSpec {
    pub global: Option<LevelFilter>,
    pub modules: BTreeMap<String, LevelFilter>,
}

impl LogSpec {
    /// The level for modules without their own filter.
    #[must_use]
    pub fn root_level(&self) -> LevelFilter {
        self.global.unwrap_or(LevelFilter::Off)
    }

    /// The most verbose level any module can log at.
    #[must_use]
    pub fn max_level(&self) -> LevelFilter {
        self.modules
            .values()
            .copied()
            .fold(self.root_level(), Ord::max)
    }

    /// Layers `other` on top of `self`.
    pub fn merge(&mut self, other: LogSpec) {
        if other.global.is_some() {
            self.global = other.global;
        }
        self.modules.extend(other.modules);
    }
}

impl FromStr for LogSpec {
    type Err = SirError;

    /// Parses a comma separated list whose entries are either a bare level (`info`), which
    /// sets the global level, or `module=level`, which sets a module filter. Levels are
    /// case-insensitive.
    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let parse_level = |level: &str| {
            LevelFilter::from_str(level.trim())
                .map_err(|_| SirError::config(format!("unknown log level `{}`", level.trim())))
        };
        let mut parsed = LogSpec::default();
        for entry in spec.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            match entry.split_once('=') {
                Some((module, level)) => {
                    parsed
                        .modules
                        .insert(module.trim().to_string(), parse_level(level)?);
                }
                None => parsed.global = Some(parse_level(entry)?),
            }
        }
        Ok(parsed)
    }
}

/// The spec currently in force and the logger it was installed into.
#[derive(Default)]
struct Installed {
    spec: LogSpec,
    backend: Backend,
}

static INSTALLED: LazyLock<Mutex<Installed>> = LazyLock::new(Mutex::default);

fn installed() -> MutexGuard<'static, Installed> {
    INSTALLED.lock().expect("Mutex poisoned")
}

/// Parses `spec` (see [`LogSpec`]), merges it into the spec in force and installs the result.
///
/// # Errors
///
/// Returns `SirError::ConfigurationError` if a level is not recognized or the logger cannot
/// be installed. The spec in force is unchanged in that case.
pub fn apply_log_spec(spec: &str) -> Result<(), SirError> {
    let parsed: LogSpec = spec.parse()?;
    let mut installed = installed();
    let mut merged = installed.spec.clone();
    merged.merge(parsed);
    installed.backend.install(&merged)?;
    installed.spec = merged;
    Ok(())
}

/// The spec in force.
#[must_use]
pub fn current_log_spec() -> LogSpec {
    installed().spec.clone()
}
