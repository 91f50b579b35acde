//! Seam to the scenario-execution engine
//!
//! The CLI never loads or executes scenarios itself. `list` and `run` hand a
//! validated [`Selection`] or [`RunPlan`] to a [`ScenarioEngine`] and feed the
//! events it produces to a [`Reporter`](crate::reporter::Reporter).

use crate::reporter::Reporter;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Which scenario files to load and which scenarios inside them to keep
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub includes: Vec<String>,
    pub excludes: Vec<String>,
    pub selectors: Vec<String>,
}

/// Everything the engine needs to execute a run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunPlan {
    pub selection: Selection,
    /// `None` lets the engine decide
    pub max_concurrency: Option<usize>,
    /// Stop after this many failures; `None` runs everything
    pub max_failures: Option<usize>,
    /// Per-scenario deadline; `None` disables it
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioMeta {
    pub name: String,
    pub file: PathBuf,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ScenarioStatus {
    Passed,
    Failed { message: String },
    Skipped { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioResult {
    pub meta: ScenarioMeta,
    pub status: ScenarioStatus,
    pub duration: Duration,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub duration: Duration,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.passed + self.failed + self.skipped
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no scenario engine is linked into this build")]
    Unavailable,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// External scenario engine driven by `list` and `run`
#[allow(async_fn_in_trait)]
pub trait ScenarioEngine {
    /// Resolve the selection into the scenarios it names, without running them
    async fn discover(&self, cwd: &Path, selection: &Selection)
    -> Result<Vec<ScenarioMeta>, EngineError>;

    /// Execute the plan, reporting every event to `reporter`
    async fn run(
        &self,
        cwd: &Path,
        plan: &RunPlan,
        reporter: &mut dyn Reporter,
    ) -> Result<RunSummary, EngineError>;
}

/// Placeholder used by the stand-alone binary
#[derive(Debug, Clone, Copy, Default)]
pub struct UnlinkedEngine;

impl ScenarioEngine for UnlinkedEngine {
    async fn discover(
        &self,
        _cwd: &Path,
        _selection: &Selection,
    ) -> Result<Vec<ScenarioMeta>, EngineError> {
        Err(EngineError::Unavailable)
    }

    async fn run(
        &self,
        _cwd: &Path,
        _plan: &RunPlan,
        _reporter: &mut dyn Reporter,
    ) -> Result<RunSummary, EngineError> {
        Err(EngineError::Unavailable)
    }
}
