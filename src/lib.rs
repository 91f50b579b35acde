//! # probitas - command-line front end for the probitas scenario runner
//!
//! This crate turns process arguments into a validated intent and hands it to
//! the right subcommand:
//!
//! - **Routing**: `--help` / `--version` handling and dispatch to `init`, `run`
//!   and `list` ([`cli::Router`])
//! - **Option parsing**: timeouts and positive integers ([`options`])
//! - **Reporters**: the closed `list` / `json` registry ([`reporter`])
//! - **Version metadata**: tool and `@probitas/*` package versions ([`metadata`])
//! - **Embedded assets**: help text and `init` templates ([`assets`])
//!
//! Scenario execution itself lives behind [`engine::ScenarioEngine`].
//!
//! ## Library Usage
//!
//! ```rust,no_run
//! use probitas::cli::{Commands, Output, Router};
//! use probitas::engine::UnlinkedEngine;
//! use std::path::Path;
//!
//! # async fn example() {
//! let output = Output::stdio();
//! let router = Router::new(Commands::new(UnlinkedEngine, output.clone()), output);
//! let code = router.run(["list", "--json"], Path::new(".")).await;
//! std::process::exit(code.code().into());
//! # }
//! ```

pub mod assets;
pub mod cli;
pub mod config;
pub mod engine;
pub mod exit_code;
pub mod metadata;
pub mod options;
pub mod reporter;

pub use exit_code::ExitCode;
