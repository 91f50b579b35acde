//! Subcommand handlers
//!
//! Every handler receives the arguments that followed its name plus the
//! working directory, parses them with its own clap definition, and returns an
//! exit code. Errors are reported here, at the handler boundary, so the router
//! only ever sees exit codes.

use crate::cli::Output;
use crate::config::{ConfigError, ProbitasConfig};
use crate::engine::{ScenarioEngine, Selection};
use crate::exit_code::ExitCode;
use crate::options::OptionError;
use crate::reporter::ReporterError;
use clap::{Args, Parser};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub mod init;
pub mod list;
pub mod run;

/// The closed set of subcommands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Init,
    Run,
    List,
}

impl Command {
    pub const ALL: [Command; 3] = [Command::Init, Command::Run, Command::List];

    pub fn name(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Run => "run",
            Self::List => "list",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned for names outside [`Command::ALL`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCommand(pub String);

impl FromStr for Command {
    type Err = UnknownCommand;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|command| command.name() == name)
            .ok_or_else(|| UnknownCommand(name.to_string()))
    }
}

/// Handlers the router dispatches to
#[allow(async_fn_in_trait)]
pub trait CommandHandlers {
    async fn init(&self, args: Vec<String>, cwd: &Path) -> ExitCode;
    async fn run(&self, args: Vec<String>, cwd: &Path) -> ExitCode;
    async fn list(&self, args: Vec<String>, cwd: &Path) -> ExitCode;
}

/// The built-in handlers, backed by a scenario engine
pub struct Commands<E> {
    engine: E,
    output: Output,
}

impl<E: ScenarioEngine> Commands<E> {
    pub fn new(engine: E, output: Output) -> Self {
        Self { engine, output }
    }
}

impl<E: ScenarioEngine> CommandHandlers for Commands<E> {
    async fn init(&self, args: Vec<String>, cwd: &Path) -> ExitCode {
        match parse_args::<init::InitArgs>(Command::Init, args, &self.output) {
            Ok(args) => finish(init::execute(args, cwd, &self.output).await, &self.output),
            Err(code) => code,
        }
    }

    async fn run(&self, args: Vec<String>, cwd: &Path) -> ExitCode {
        match parse_args::<run::RunArgs>(Command::Run, args, &self.output) {
            Ok(args) => finish(
                run::execute(args, cwd, &self.engine, &self.output).await,
                &self.output,
            ),
            Err(code) => code,
        }
    }

    async fn list(&self, args: Vec<String>, cwd: &Path) -> ExitCode {
        match parse_args::<list::ListArgs>(Command::List, args, &self.output) {
            Ok(args) => finish(
                list::execute(args, cwd, &self.engine, &self.output).await,
                &self.output,
            ),
            Err(code) => code,
        }
    }
}

/// Scenario selection flags shared by `run` and `list`
#[derive(Args, Debug, Clone, Default)]
pub struct SelectionArgs {
    /// Scenario selectors: a name, "tag:<tag>", or either prefixed with "!" to exclude
    #[arg(value_name = "SELECTOR")]
    pub selectors: Vec<String>,

    /// Additional selector (repeatable)
    #[arg(short = 's', long = "select", value_name = "SELECTOR")]
    pub select: Vec<String>,

    /// Glob for scenario files (repeatable, replaces configured includes)
    #[arg(long, value_name = "GLOB")]
    pub include: Vec<String>,

    /// Glob for files to skip (repeatable, replaces configured excludes)
    #[arg(long, value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// Configuration file instead of ./probitas.json
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl SelectionArgs {
    /// Command-line values win; empty lists fall back to the configuration
    pub fn into_selection(self, config: &ProbitasConfig) -> Selection {
        let selectors: Vec<String> = self.selectors.into_iter().chain(self.select).collect();
        Selection {
            includes: or_configured(self.include, &config.includes),
            excludes: or_configured(self.exclude, &config.excludes),
            selectors: or_configured(selectors, &config.selectors),
        }
    }
}

fn or_configured(cli: Vec<String>, configured: &[String]) -> Vec<String> {
    if cli.is_empty() { configured.to_vec() } else { cli }
}

/// Parse a subcommand's arguments; `Err` carries the exit code when parsing ends the command
fn parse_args<T: Parser>(command: Command, args: Vec<String>, output: &Output) -> Result<T, ExitCode> {
    let argv = std::iter::once(command.name().to_string()).chain(args);
    T::try_parse_from(argv).map_err(|err| {
        let rendered = err.render().to_string();
        if err.use_stderr() {
            tracing::debug!(%command, kind = ?err.kind(), "Invalid subcommand arguments");
            output.raw_error(&rendered);
            ExitCode::USAGE_ERROR
        } else {
            // --help / --version inside the subcommand
            output.line(rendered.trim_end());
            ExitCode::SUCCESS
        }
    })
}

/// Turn a handler result into an exit code, reporting the error if there is one
fn finish(result: anyhow::Result<ExitCode>, output: &Output) -> ExitCode {
    match result {
        Ok(code) => code,
        Err(err) => {
            tracing::debug!(error = ?err, "Command failed");
            output.error(&format!("{err:#}"));
            if is_usage_error(&err) {
                ExitCode::USAGE_ERROR
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn is_usage_error(err: &anyhow::Error) -> bool {
    err.downcast_ref::<OptionError>().is_some()
        || err.downcast_ref::<ReporterError>().is_some()
        || err.downcast_ref::<ConfigError>().is_some()
}
