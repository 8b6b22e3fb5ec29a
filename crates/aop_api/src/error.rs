//! Error types for backend calls.

use thiserror::Error;

/// Why a backend call failed.
///
/// Transport failures, non-success statuses and undecodable bodies are kept
/// apart so callers never mistake an error page for data.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The configured base URL cannot be used.
    #[error("invalid API base URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// The underlying HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The request never produced a response (connect, IO, timeout).
    #[error("{method} {path} failed: {source}")]
    Transport {
        method: &'static str,
        path: String,
        #[source]
        source: reqwest::Error,
    },

    /// The backend answered with a non-2xx status.
    #[error("{method} {path} returned HTTP {status}{}", status_detail(.body))]
    Status {
        method: &'static str,
        path: String,
        status: u16,
        body: String,
    },

    /// The backend answered 2xx with a body that is not the expected JSON.
    #[error("{method} {path} returned an unreadable body: {source}")]
    Decode {
        method: &'static str,
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    /// HTTP status for [`ApiError::Status`], `None` otherwise.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the failure happened before any response arrived.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}

/// Longest response body echoed into an error message.
const MAX_BODY_IN_MESSAGE: usize = 120;

fn status_detail(body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        return String::new();
    }
    let mut detail: String = body.chars().take(MAX_BODY_IN_MESSAGE).collect();
    if detail.len() < body.len() {
        detail.push_str("...");
    }
    format!(": {detail}")
}
