//! Machine-readable reporter: one JSON object per event, newline delimited

use super::{Reporter, ReporterOptions};
use crate::engine::{RunSummary, ScenarioMeta, ScenarioResult};
use crate::metadata;
use serde_json::{Value, json};
use std::io::{self, Write};

pub struct JsonReporter {
    out: Box<dyn Write + Send>,
    version: Option<String>,
}

impl JsonReporter {
    pub fn new(options: ReporterOptions) -> Self {
        Self {
            out: options.sink(),
            version: metadata::resolve_version(),
        }
    }

    fn emit(&mut self, event: &Value) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, event)?;
        writeln!(self.out)?;
        self.out.flush()
    }
}

impl Reporter for JsonReporter {
    fn on_run_start(&mut self, scenarios: &[ScenarioMeta]) -> io::Result<()> {
        let event = json!({
            "type": "runStart",
            "version": self.version,
            "scenarios": scenarios,
        });
        self.emit(&event)
    }

    fn on_scenario_end(&mut self, result: &ScenarioResult) -> io::Result<()> {
        let mut event = json!({
            "type": "scenarioEnd",
            "name": result.meta.name,
            "file": result.meta.file,
            "durationMs": result.duration.as_millis() as u64,
        });
        // Flatten {"status": ..., "message"/"reason": ...} into the event
        if let (Value::Object(event), Ok(Value::Object(status))) =
            (&mut event, serde_json::to_value(&result.status))
        {
            event.extend(status);
        }
        self.emit(&event)
    }

    fn on_run_end(&mut self, summary: &RunSummary) -> io::Result<()> {
        let event = json!({
            "type": "runEnd",
            "total": summary.total(),
            "passed": summary.passed,
            "failed": summary.failed,
            "skipped": summary.skipped,
            "durationMs": summary.duration.as_millis() as u64,
        });
        self.emit(&event)
    }
}
