//! Runtime configuration.
//!
//! [`Config`] is built once from parsed CLI arguments (which already carry
//! their environment fallbacks) and validated before anything touches the
//! network or the terminal.

use std::path::PathBuf;
use std::time::Duration;

use aop_api::ClientConfig;

use crate::cli::Cli;
use crate::messages::Page;

/// Where log output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    /// Headless commands log to stderr.
    Stderr,
    /// Append to a file.
    File(PathBuf),
    /// No subscriber is installed.
    Disabled,
}

/// Validated runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend client settings.
    pub api: ClientConfig,
    /// First page shown by the UI.
    pub route: Page,
    /// Emit colors.
    pub color: bool,
    /// Use the alternate screen buffer.
    pub alt_screen: bool,
    /// Explicit log file, if any.
    pub log_file: Option<PathBuf>,
    /// `-v` count.
    pub verbosity: u8,
    /// A headless subcommand was given.
    pub headless: bool,
}

impl Config {
    /// Create config from CLI arguments.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for an unknown route or a zero timeout.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let route =
            Page::from_path(&cli.route).ok_or_else(|| ConfigError::UnknownRoute(cli.route.clone()))?;

        if cli.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        Ok(Self {
            api: ClientConfig {
                base_url: cli.api_base_url.clone(),
                timeout: Duration::from_secs(cli.timeout_secs),
            },
            route,
            color: !cli.no_color,
            alt_screen: !cli.no_alt_screen,
            log_file: cli.log_file.clone(),
            verbosity: cli.verbose,
            headless: cli.is_headless(),
        })
    }

    /// Where logs should be written.
    ///
    /// A log file always wins. Otherwise headless runs use stderr and the
    /// interactive UI, which owns the terminal, logs nothing.
    #[must_use]
    pub fn log_target(&self) -> LogTarget {
        match (&self.log_file, self.headless) {
            (Some(path), _) => LogTarget::File(path.clone()),
            (None, true) => LogTarget::Stderr,
            (None, false) => LogTarget::Disabled,
        }
    }
}

/// Configuration error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// `--route` names no page.
    #[error("unknown route {0:?} (expected one of /, /aop, /budgets, /users)")]
    UnknownRoute(String),

    /// A zero timeout would fail every request.
    #[error("timeout must be at least one second")]
    ZeroTimeout,
}
