//! Initialize probitas in a directory
//!
//! Writes a starter `probitas.json` and an example scenario from the embedded templates.

use crate::assets::{Embedded, ResourceLoader};
use crate::cli::Output;
use crate::exit_code::ExitCode;
use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;

/// Destination (relative to the working directory) and template asset
const TEMPLATES: [(&str, &str); 2] = [
    ("probitas.json", "templates/probitas.json"),
    (
        "probitas/example.probitas.ts",
        "templates/example.probitas.ts",
    ),
];

#[derive(Parser, Debug)]
#[command(
    name = "init",
    bin_name = "probitas init",
    about = "Create probitas.json and an example scenario"
)]
pub struct InitArgs {
    /// Overwrite files that already exist
    #[arg(short, long)]
    pub force: bool,
}

pub async fn execute(args: InitArgs, cwd: &Path, output: &Output) -> Result<ExitCode> {
    tracing::debug!(cwd = %cwd.display(), force = args.force, "Initializing probitas");

    if !args.force {
        let existing: Vec<&str> = TEMPLATES
            .iter()
            .map(|(dest, _)| *dest)
            .filter(|dest| cwd.join(dest).exists())
            .collect();

        if !existing.is_empty() {
            for dest in &existing {
                output.error(&format!("{dest} already exists"));
            }
            output.hint("Use --force to overwrite");
            return Ok(ExitCode::FAILURE);
        }
    }

    for (dest, asset) in TEMPLATES {
        let content = Embedded.read_asset(asset)?;
        let path = cwd.join(dest);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        tokio::fs::write(&path, content.as_bytes())
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;

        output.success(&format!("Created {dest}"));
    }

    output.blank_line();
    output.line("Run 'probitas run' to execute the example scenario");
    Ok(ExitCode::SUCCESS)
}
