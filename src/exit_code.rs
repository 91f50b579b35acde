//! Process exit codes
//!
//! The router only ever produces [`ExitCode::SUCCESS`] and [`ExitCode::USAGE_ERROR`];
//! anything else comes back from a subcommand handler and is forwarded as-is.

use std::fmt;

/// Exit code returned by the router and the subcommand handlers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExitCode(u8);

impl ExitCode {
    /// Everything went fine
    pub const SUCCESS: Self = Self(0);
    /// At least one scenario failed, or the engine gave up
    pub const FAILURE: Self = Self(1);
    /// Bad invocation: unknown command, invalid option, unreadable help text
    pub const USAGE_ERROR: Self = Self(2);
    /// Nothing matched the selection
    pub const NOT_FOUND: Self = Self(4);

    /// Wrap a raw code returned by an external handler
    pub const fn from_raw(code: u8) -> Self {
        Self(code)
    }

    pub const fn code(self) -> u8 {
        self.0
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        std::process::ExitCode::from(code.0)
    }
}
