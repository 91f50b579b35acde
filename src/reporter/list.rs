//! Human-readable reporter, one line per scenario

use super::{Reporter, ReporterOptions, format_duration};
use crate::engine::{RunSummary, ScenarioMeta, ScenarioResult, ScenarioStatus};
use console::{StyledObject, style};
use std::io::{self, Write};

pub struct ListReporter {
    out: Box<dyn Write + Send>,
    styled: bool,
}

impl ListReporter {
    pub fn new(options: ReporterOptions) -> Self {
        Self {
            out: options.sink(),
            styled: !options.no_color,
        }
    }

    fn paint<D>(&self, value: D) -> StyledObject<D> {
        let styled = style(value);
        if self.styled {
            styled
        } else {
            styled.force_styling(false)
        }
    }
}

impl Reporter for ListReporter {
    fn on_run_start(&mut self, scenarios: &[ScenarioMeta]) -> io::Result<()> {
        let noun = if scenarios.len() == 1 { "scenario" } else { "scenarios" };
        let header = self.paint(format!("Running {} {noun}", scenarios.len())).dim();
        writeln!(self.out, "{header}")?;
        writeln!(self.out)
    }

    fn on_scenario_end(&mut self, result: &ScenarioResult) -> io::Result<()> {
        let elapsed = self.paint(format!("({})", format_duration(result.duration))).dim();
        match &result.status {
            ScenarioStatus::Passed => {
                let icon = self.paint("✓").green();
                writeln!(self.out, "{icon} {} {elapsed}", result.meta.name)
            }
            ScenarioStatus::Failed { message } => {
                let icon = self.paint("✗").red().bold();
                writeln!(self.out, "{icon} {} {elapsed}", result.meta.name)?;
                for line in message.lines() {
                    writeln!(self.out, "    {}", self.paint(line).red())?;
                }
                let location = self.paint(result.meta.file.display().to_string()).dim();
                writeln!(self.out, "    at {location}")
            }
            ScenarioStatus::Skipped { reason } => {
                let icon = self.paint("⊘").yellow();
                let reason = self.paint(format!("(skipped: {reason})")).dim();
                writeln!(self.out, "{icon} {} {reason}", result.meta.name)
            }
        }
    }

    fn on_run_end(&mut self, summary: &RunSummary) -> io::Result<()> {
        let passed = self.paint(format!("{} passed", summary.passed)).green();
        let failed = if summary.failed > 0 {
            self.paint(format!("{} failed", summary.failed)).red().bold()
        } else {
            self.paint(format!("{} failed", summary.failed)).dim()
        };
        let skipped = self.paint(format!("{} skipped", summary.skipped)).yellow();
        let elapsed = self.paint(format!("({})", format_duration(summary.duration))).dim();

        writeln!(self.out)?;
        writeln!(self.out, "{passed}, {failed}, {skipped} {elapsed}")?;
        self.out.flush()
    }
}
