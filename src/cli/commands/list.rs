//! List the scenarios a selection resolves to, without running them

use super::SelectionArgs;
use crate::cli::Output;
use crate::config::ProbitasConfig;
use crate::engine::ScenarioEngine;
use crate::exit_code::ExitCode;
use anyhow::Result;
use clap::Parser;
use console::style;
use std::path::Path;

#[derive(Parser, Debug)]
#[command(name = "list", bin_name = "probitas list", about = "List scenarios without running them")]
pub struct ListArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Print scenarios as a JSON array
    #[arg(long)]
    pub json: bool,
}

pub async fn execute(
    args: ListArgs,
    cwd: &Path,
    engine: &impl ScenarioEngine,
    output: &Output,
) -> Result<ExitCode> {
    let config = ProbitasConfig::load(cwd, args.selection.config.as_deref())?;
    let selection = args.selection.into_selection(&config);
    tracing::debug!(?selection, "Listing scenarios");

    let scenarios = engine.discover(cwd, &selection).await?;

    if args.json {
        output.line(&serde_json::to_string_pretty(&scenarios)?);
        return Ok(ExitCode::SUCCESS);
    }

    if scenarios.is_empty() {
        output.warning("No scenarios found");
        return Ok(ExitCode::SUCCESS);
    }

    for scenario in &scenarios {
        let location = style(format!("({})", scenario.file.display())).dim();
        if scenario.tags.is_empty() {
            output.line(&format!("{}  {location}", scenario.name));
        } else {
            let tags = style(format!("[{}]", scenario.tags.join(", "))).cyan();
            output.line(&format!("{} {tags}  {location}", scenario.name));
        }
    }

    output.blank_line();
    let noun = if scenarios.len() == 1 { "scenario" } else { "scenarios" };
    output.line(&format!("Total: {} {noun}", scenarios.len()));
    Ok(ExitCode::SUCCESS)
}
