//! Project configuration for `probitas run` and `probitas list`
//!
//! Settings come from built-in defaults, then `probitas.json` in the working
//! directory (or the file passed with `--config`), then `PROBITAS_*`
//! environment variables. Command-line flags are applied on top by the
//! subcommands themselves.

mod core;

pub use self::core::{CONFIG_FILE, ConfigError, ENV_PREFIX};

use crate::options::OptionValue;
use serde::Deserialize;

/// Glob used when neither the config file nor the command line names any
pub const DEFAULT_INCLUDE: &str = "**/*.probitas.ts";

/// Merged configuration, before option validation
///
/// File and environment keys are camelCased before extraction, so
/// `max_concurrency` in the file and `PROBITAS_MAX_CONCURRENCY` both land on
/// `maxConcurrency`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProbitasConfig {
    /// Globs selecting scenario files
    pub includes: Vec<String>,

    /// Globs removed from `includes`
    pub excludes: Vec<String>,

    /// Scenario selectors applied when none are given on the command line
    pub selectors: Vec<String>,

    /// Reporter name; validated when the reporter is resolved
    pub reporter: Option<String>,

    pub max_concurrency: Option<OptionValue>,

    pub max_failures: Option<OptionValue>,

    /// `30s`, `10m`, `1h` or a number of seconds
    pub timeout: Option<OptionValue>,
}

impl Default for ProbitasConfig {
    fn default() -> Self {
        Self {
            includes: vec![DEFAULT_INCLUDE.to_string()],
            excludes: Vec::new(),
            selectors: Vec::new(),
            reporter: None,
            max_concurrency: None,
            max_failures: None,
            timeout: None,
        }
    }
}

#[cfg(test)]
mod tests;
