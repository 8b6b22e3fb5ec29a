//! Command-line interface for `aop-console`.
//!
//! Without a subcommand the interactive terminal UI runs. Subcommands call
//! the same backend client and print plain text to stdout.
//!
//! # Examples
//!
//! ```bash
//! # Open the UI on the AOP management page
//! aop-console --route /aop
//!
//! # Point at another backend
//! AOP_API_BASE_URL=http://budget.internal:8080 aop-console
//!
//! # Headless
//! aop-console aops
//! aop-console create Q1-2025
//! aop-console set-state 3 active
//! ```

use std::path::PathBuf;

use aop_api::{AopId, AopState, DEFAULT_BASE_URL};
use clap::builder::FalseyValueParser;
use clap::{Parser, Subcommand};

/// Terminal client for AOP budget cycles.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "aop-console",
    author,
    version,
    about = "Terminal client for AOP budget cycles",
    long_about = "Browse budget totals for the active AOP, create AOPs and move them \
                  between draft, active and EOL."
)]
pub struct Cli {
    /// Base URL of the budget backend
    #[arg(long, env = "AOP_API_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub api_base_url: String,

    /// Per-request timeout in seconds
    #[arg(long, env = "AOP_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,

    /// Page to open first (/, /aop, /budgets, /users)
    #[arg(long, env = "AOP_ROUTE", default_value = "/")]
    pub route: String,

    /// Force color output off
    ///
    /// Respects the `NO_COLOR` environment variable: any value other than
    /// an empty or false-like one turns color off
    #[arg(long, env = "NO_COLOR", value_parser = FalseyValueParser::new())]
    pub no_color: bool,

    /// Run in the main terminal buffer instead of the alternate screen
    #[arg(long)]
    pub no_alt_screen: bool,

    /// Append logs to this file
    ///
    /// The interactive UI logs nothing unless this is set
    #[arg(long, env = "AOP_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Optional headless subcommand
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Headless subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List all AOPs
    Aops,

    /// Create an AOP (the backend starts it in draft)
    Create {
        /// Name of the new AOP
        name: String,
    },

    /// Move an AOP to another state
    SetState {
        /// AOP id
        id: AopId,
        /// Target state: draft, active or EOL
        state: AopState,
    },

    /// Print the active AOP and its budget totals
    Dashboard,

    /// Print the route table
    Routes,
}

impl Command {
    /// Whether the command talks to the backend.
    #[must_use]
    pub const fn needs_backend(&self) -> bool {
        !matches!(self, Self::Routes)
    }
}

impl Cli {
    /// Parse command line arguments.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Create CLI from iterator (useful for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if argument parsing fails.
    pub fn try_parse_from<I, T>(iter: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// Whether a headless subcommand was given.
    #[must_use]
    pub const fn is_headless(&self) -> bool {
        self.command.is_some()
    }
}
