//! Run scenarios through the engine and report the results

use super::SelectionArgs;
use crate::cli::Output;
use crate::config::ProbitasConfig;
use crate::engine::{RunPlan, ScenarioEngine};
use crate::exit_code::ExitCode;
use crate::options::{OptionError, OptionValue, parse_positive_integer, parse_timeout};
use crate::reporter::{ReporterOptions, resolve_reporter};
use anyhow::Result;
use clap::Parser;
use std::path::Path;

#[derive(Parser, Debug)]
#[command(name = "run", bin_name = "probitas run", about = "Run scenarios")]
pub struct RunArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Output format: list or json
    #[arg(long, value_name = "NAME")]
    pub reporter: Option<String>,

    /// Run at most N scenarios at once
    #[arg(long, value_name = "N", conflicts_with = "sequential")]
    pub max_concurrency: Option<String>,

    /// Run scenarios one at a time (same as --max-concurrency 1)
    #[arg(long)]
    pub sequential: bool,

    /// Stop after N failed scenarios
    #[arg(long, value_name = "N", conflicts_with = "fail_fast")]
    pub max_failures: Option<String>,

    /// Stop at the first failure (same as --max-failures 1)
    #[arg(long)]
    pub fail_fast: bool,

    /// Per-scenario timeout: 30s, 10m, 1h or seconds; 0 disables it
    #[arg(long, value_name = "DURATION")]
    pub timeout: Option<String>,

    /// Disable coloured output
    #[arg(long)]
    pub no_color: bool,
}

pub async fn execute(
    args: RunArgs,
    cwd: &Path,
    engine: &impl ScenarioEngine,
    output: &Output,
) -> Result<ExitCode> {
    let config = ProbitasConfig::load(cwd, args.selection.config.as_deref())?;
    let reporter_name = args.reporter.clone().or_else(|| config.reporter.clone());
    let no_color = args.no_color;
    let plan = build_plan(args, &config)?;

    let options = ReporterOptions {
        output: Some(output.clone()),
        no_color,
    };
    let mut reporter = resolve_reporter(reporter_name.as_deref(), options)?;

    tracing::debug!(?plan, "Running scenarios");
    let summary = engine.run(cwd, &plan, reporter.as_mut()).await?;
    tracing::debug!(?summary, "Run finished");

    if summary.total() == 0 {
        output.warning("No scenarios found");
        return Ok(ExitCode::NOT_FOUND);
    }
    if summary.failed > 0 {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

/// Merge flags over configuration and validate every numeric option
pub fn build_plan(args: RunArgs, config: &ProbitasConfig) -> Result<RunPlan, OptionError> {
    let max_concurrency = if args.sequential {
        Some(1)
    } else {
        let value = args
            .max_concurrency
            .map(OptionValue::from)
            .or_else(|| config.max_concurrency.clone());
        parse_positive_integer(value, "max-concurrency")?
    };

    let max_failures = if args.fail_fast {
        Some(1)
    } else {
        let value = args
            .max_failures
            .map(OptionValue::from)
            .or_else(|| config.max_failures.clone());
        parse_positive_integer(value, "max-failures")?
    };

    let timeout = match args.timeout.map(OptionValue::from).or_else(|| config.timeout.clone()) {
        Some(value) => parse_timeout(&value.as_text())?,
        None => None,
    };

    Ok(RunPlan {
        selection: args.selection.into_selection(config),
        max_concurrency,
        max_failures,
        timeout,
    })
}
