//! Reporter registry
//!
//! Reporters turn engine events into output. The set of reporters is closed:
//! [`ReporterKind`] names every variant and [`resolve_reporter`] is the only
//! constructor the subcommands use.

use crate::cli::Output;
use crate::engine::{RunSummary, ScenarioMeta, ScenarioResult};
use std::fmt;
use std::io;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

mod json;
mod list;

pub use json::JsonReporter;
pub use list::ListReporter;

/// Receives run events from the scenario engine
pub trait Reporter {
    fn on_run_start(&mut self, scenarios: &[ScenarioMeta]) -> io::Result<()>;
    fn on_scenario_end(&mut self, result: &ScenarioResult) -> io::Result<()>;
    fn on_run_end(&mut self, summary: &RunSummary) -> io::Result<()>;
}

/// Options handed through to the reporter constructor untouched
#[derive(Debug, Clone, Default)]
pub struct ReporterOptions {
    /// Destination for the report; process stdout when unset
    pub output: Option<Output>,
    /// Disable ANSI styling
    pub no_color: bool,
}

impl ReporterOptions {
    pub(crate) fn sink(&self) -> Box<dyn io::Write + Send> {
        match &self.output {
            Some(output) => Box::new(output.writer()),
            None => Box::new(io::stdout()),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReporterError {
    #[error("Unknown reporter: {name}")]
    Unknown { name: String },
}

/// Every reporter the CLI knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReporterKind {
    #[default]
    List,
    Json,
}

impl ReporterKind {
    pub const ALL: [ReporterKind; 2] = [ReporterKind::List, ReporterKind::Json];

    pub fn name(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Json => "json",
        }
    }

    pub fn build(self, options: ReporterOptions) -> Box<dyn Reporter> {
        match self {
            Self::List => Box::new(ListReporter::new(options)),
            Self::Json => Box::new(JsonReporter::new(options)),
        }
    }
}

impl fmt::Display for ReporterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ReporterKind {
    type Err = ReporterError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| ReporterError::Unknown {
                name: name.to_string(),
            })
    }
}

/// Resolve a reporter by name; `None` selects the list reporter
pub fn resolve_reporter(
    name: Option<&str>,
    options: ReporterOptions,
) -> Result<Box<dyn Reporter>, ReporterError> {
    tracing::debug!(
        reporter = name.unwrap_or(ReporterKind::default().name()),
        no_color = options.no_color,
        "Resolving reporter"
    );

    let Some(name) = name else {
        tracing::debug!(reporter = "list", "Using default reporter");
        return Ok(ReporterKind::default().build(options));
    };

    let kind: ReporterKind = name.parse()?;
    tracing::debug!(reporter = %kind, "Reporter resolved");
    Ok(kind.build(options))
}

/// `850ms`, `1.25s`, `2m 5s`
pub(crate) fn format_duration(duration: Duration) -> String {
    let millis = duration.as_millis();
    if millis < 1000 {
        format!("{millis}ms")
    } else if millis < 60_000 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        let secs = duration.as_secs();
        format!("{}m {}s", secs / 60, secs % 60)
    }
}
