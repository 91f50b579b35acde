//! Command-line interface for probitas
//!
//! The router only understands two global flags, `--help` and `--version`.
//! Flag parsing stops at the first positional argument: that argument names
//! the subcommand, and everything after it (flags included) is handed to the
//! subcommand untouched.

use crate::assets::{Embedded, ResourceLoader};
use crate::exit_code::ExitCode;
use crate::metadata;
use clap::Parser;
use std::ffi::OsString;
use std::path::Path;

pub mod commands;
mod output;

pub use commands::{Command, CommandHandlers, Commands};
pub use output::{Captured, Output, OutputWriter};

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "PROBITAS_LOG";

const HELP_ASSET: &str = "usage.txt";

/// Global flags; the help text comes from `usage.txt`, not from clap
#[derive(Parser, Debug)]
#[command(
    name = "probitas",
    disable_help_flag = true,
    disable_version_flag = true,
    args_override_self = true
)]
struct GlobalArgs {
    #[arg(short = 'h', long = "help")]
    help: bool,

    #[arg(short = 'V', long = "version")]
    version: bool,

    /// Subcommand followed by its own arguments
    #[arg(trailing_var_arg = true, value_name = "COMMAND")]
    positionals: Vec<String>,
}

/// Result of splitting the raw argument vector
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedArguments {
    pub show_help: bool,
    pub show_version: bool,
    pub command: Option<String>,
    pub command_args: Vec<String>,
}

impl ParsedArguments {
    /// Parse process arguments, excluding the program name
    pub fn parse<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let argv = std::iter::once(OsString::from("probitas"))
            .chain(args.into_iter().map(Into::into));
        let global = GlobalArgs::try_parse_from(argv)?;

        let mut positionals = global.positionals.into_iter();
        Ok(Self {
            show_help: global.help,
            show_version: global.version,
            command: positionals.next(),
            command_args: positionals.collect(),
        })
    }
}

/// Entry point: turns an argument vector into an exit code
pub struct Router<H, R = Embedded> {
    handlers: H,
    resources: R,
    output: Output,
}

impl<H: CommandHandlers> Router<H> {
    pub fn new(handlers: H, output: Output) -> Self {
        Self::with_resources(handlers, Embedded, output)
    }
}

impl<H: CommandHandlers, R: ResourceLoader> Router<H, R> {
    pub fn with_resources(handlers: H, resources: R, output: Output) -> Self {
        Self {
            handlers,
            resources,
            output,
        }
    }

    /// Handle one invocation. Never fails: problems become a usage error exit code.
    pub async fn run<I, T>(&self, args: I, cwd: &Path) -> ExitCode
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let parsed = match ParsedArguments::parse(args) {
            Ok(parsed) => parsed,
            Err(err) => {
                tracing::error!(kind = ?err.kind(), "Failed to parse global flags");
                self.output.raw_error(&err.render().to_string());
                return ExitCode::USAGE_ERROR;
            }
        };
        tracing::debug!(?parsed, cwd = %cwd.display(), "Parsed arguments");

        if parsed.show_version {
            self.print_version();
            return ExitCode::SUCCESS;
        }

        let command = match parsed.command {
            Some(command) if !parsed.show_help => command,
            _ => return self.print_help(),
        };

        match command.parse::<Command>() {
            Ok(Command::Init) => self.handlers.init(parsed.command_args, cwd).await,
            Ok(Command::Run) => self.handlers.run(parsed.command_args, cwd).await,
            Ok(Command::List) => self.handlers.list(parsed.command_args, cwd).await,
            Err(_) => {
                self.output.warning(&format!("Unknown command: {command}"));
                self.output.hint("Run 'probitas --help' for usage information");
                ExitCode::USAGE_ERROR
            }
        }
    }

    fn print_version(&self) {
        match metadata::resolve_version_info_with(&self.resources) {
            Some(info) => {
                self.output.line(&format!("probitas {}", info.version));
                for package in &info.packages {
                    self.output
                        .line(&format!("  {} {}", package.name, package.version));
                }
            }
            None => self.output.line("probitas unknown"),
        }
    }

    fn print_help(&self) -> ExitCode {
        match self.resources.read_asset(HELP_ASSET) {
            Ok(help) => {
                self.output.line(help.trim_end());
                ExitCode::SUCCESS
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to read help file");
                ExitCode::USAGE_ERROR
            }
        }
    }
}

/// Install the stderr log subscriber; the filter comes from `PROBITAS_LOG` (default `warn`)
pub fn setup_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();

    if installed.is_err() {
        tracing::debug!("Logging already initialized");
    }
}
