//! Tracing subscriber setup.
//!
//! `RUST_LOG` wins when set; otherwise the `-v` count picks the level.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::Subscriber;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LogTarget;

/// Errors raised while installing the subscriber.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("cannot open log file {path}: {source}")]
    OpenFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Level used when `RUST_LOG` is unset.
#[must_use]
pub const fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn filter(verbosity: u8) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_for(verbosity)))
}

fn open_log_file(path: &Path) -> Result<File, LoggingError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| LoggingError::OpenFile {
            path: path.to_path_buf(),
            source,
        })
}

/// A subscriber appending plain-text events to `path`.
///
/// # Errors
///
/// Returns [`LoggingError::OpenFile`] if the file cannot be opened.
pub fn file_subscriber(
    verbosity: u8,
    path: &Path,
) -> Result<impl Subscriber + Send + Sync + 'static, LoggingError> {
    let file = open_log_file(path)?;
    Ok(tracing_subscriber::registry().with(filter(verbosity)).with(
        tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(Mutex::new(file)),
    ))
}

/// Install the global subscriber for `target`.
///
/// Returns `false` when nothing was installed, either because logging is
/// disabled or because a subscriber already exists.
///
/// # Errors
///
/// Returns [`LoggingError::OpenFile`] if a log file cannot be opened.
pub fn init(verbosity: u8, target: &LogTarget) -> Result<bool, LoggingError> {
    let installed = match target {
        LogTarget::Disabled => return Ok(false),
        LogTarget::File(path) => file_subscriber(verbosity, path)?.try_init().is_ok(),
        LogTarget::Stderr => tracing_subscriber::registry()
            .with(filter(verbosity))
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .try_init()
            .is_ok(),
    };
    Ok(installed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_levels() {
        assert_eq!(level_for(0), "warn");
        assert_eq!(level_for(1), "info");
        assert_eq!(level_for(2), "debug");
        assert_eq!(level_for(3), "trace");
        assert_eq!(level_for(9), "trace");
    }

    #[test]
    fn disabled_installs_nothing() {
        assert!(!init(3, &LogTarget::Disabled).unwrap());
    }

    #[test]
    fn file_subscriber_writes_plain_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("console.log");
        let subscriber = file_subscriber(1, &path).unwrap();

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(route = "/aop", "navigate");
            tracing::debug!("filtered out at info");
        });

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("navigate"));
        assert!(contents.contains("route=\"/aop\""));
        assert!(!contents.contains("filtered out"));
        assert!(!contents.contains('\x1b'));
    }

    #[test]
    fn unopenable_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("console.log");
        let Err(err) = file_subscriber(0, &path) else {
            panic!("expected open failure");
        };
        assert!(err.to_string().contains("console.log"));
    }
}
