//! Blocking REST client for the AOP backend.
//!
//! | Call | Request |
//! |---|---|
//! | [`AopApi::active_aop`] | `GET /aop/active` |
//! | [`AopApi::aops`] | `GET /aop` |
//! | [`AopApi::budgets`] | `GET /budgets?aop={id}` |
//! | [`AopApi::create_aop`] | `POST /aop` with `{"name"}` |
//! | [`AopApi::update_aop_state`] | `PATCH /aop/{id}` with `{"state"}` |
//!
//! Every call is exactly one round trip. There is no retry and no caching.

use std::time::Duration;

use reqwest::Url;
use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::model::{Aop, AopId, AopState, Budget, CreateAopBody, StateChangeBody};

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Per-request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Operations the backend exposes.
///
/// Implemented by [`HttpClient`] for real use and by in-memory fakes in
/// tests.
pub trait AopApi: Send + Sync {
    /// The AOP currently in the active state.
    fn active_aop(&self) -> Result<Aop, ApiError>;

    /// All AOPs, in the order the backend returns them.
    fn aops(&self) -> Result<Vec<Aop>, ApiError>;

    /// Budgets attached to `aop_id`.
    fn budgets(&self, aop_id: AopId) -> Result<Vec<Budget>, ApiError>;

    /// Create an AOP. The backend decides its initial state.
    fn create_aop(&self, name: &str) -> Result<Aop, ApiError>;

    /// Move an AOP to `state`.
    fn update_aop_state(&self, aop_id: AopId, state: AopState) -> Result<Aop, ApiError>;
}

/// Connection settings for [`HttpClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// [`AopApi`] over HTTP using a blocking `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
}

impl HttpClient {
    /// Build a client for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidBaseUrl`] when the base URL is not an
    /// absolute `http`/`https` URL, and [`ApiError::Client`] when the HTTP
    /// client cannot be initialized.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let base_url = normalize_base_url(&config.base_url)?;
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("aop-console/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ApiError::Client)?;

        debug!(base_url = %base_url, timeout_secs = config.timeout.as_secs(), "API client ready");

        Ok(Self { client, base_url })
    }

    /// The normalized base URL (no trailing slash).
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn send<T: DeserializeOwned>(
        &self,
        method: &'static str,
        path: &str,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        debug!(method, path, "sending request");

        let response = request.send().map_err(|source| {
            warn!(method, path, error = %source, "request failed");
            ApiError::Transport {
                method,
                path: path.to_string(),
                source,
            }
        })?;

        let status = response.status();
        let body = response.text().map_err(|source| ApiError::Transport {
            method,
            path: path.to_string(),
            source,
        })?;

        if !status.is_success() {
            warn!(method, path, status = status.as_u16(), "backend rejected request");
            return Err(ApiError::Status {
                method,
                path: path.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|source| {
            warn!(method, path, error = %source, "response body did not decode");
            ApiError::Decode {
                method,
                path: path.to_string(),
                source,
            }
        })
    }
}

impl AopApi for HttpClient {
    fn active_aop(&self) -> Result<Aop, ApiError> {
        let path = "/aop/active";
        self.send("GET", path, self.client.get(self.url(path)))
    }

    fn aops(&self) -> Result<Vec<Aop>, ApiError> {
        let path = "/aop";
        self.send("GET", path, self.client.get(self.url(path)))
    }

    fn budgets(&self, aop_id: AopId) -> Result<Vec<Budget>, ApiError> {
        let path = format!("/budgets?aop={aop_id}");
        self.send("GET", &path, self.client.get(self.url(&path)))
    }

    fn create_aop(&self, name: &str) -> Result<Aop, ApiError> {
        let path = "/aop";
        let request = self
            .client
            .post(self.url(path))
            .json(&CreateAopBody { name });
        self.send("POST", path, request)
    }

    fn update_aop_state(&self, aop_id: AopId, state: AopState) -> Result<Aop, ApiError> {
        let path = format!("/aop/{aop_id}");
        let request = self
            .client
            .patch(self.url(&path))
            .json(&StateChangeBody { state });
        self.send("PATCH", &path, request)
    }
}

/// Validate `raw` and strip trailing slashes so joined paths never contain
/// `//`.
fn normalize_base_url(raw: &str) -> Result<String, ApiError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let invalid = |reason: &str| ApiError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: reason.to_string(),
    };

    let parsed = Url::parse(trimmed).map_err(|e| invalid(&e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }
    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(invalid("base URL must not carry a query or fragment"));
    }

    Ok(trimmed.to_string())
}
