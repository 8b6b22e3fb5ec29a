//! Wire types shared with the backend.
//!
//! Fields the backend may add beyond the ones modeled here are ignored on
//! decode.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Backend identifier of an AOP.
pub type AopId = u64;

/// Lifecycle state of an AOP.
///
/// The client sends `"draft"`, `"active"` and `"EOL"`. The backend's own enum
/// spells the terminal state `"eol"`, so both spellings are accepted on
/// decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AopState {
    #[serde(rename = "draft")]
    Draft,
    #[serde(rename = "active")]
    Active,
    #[serde(rename = "EOL", alias = "eol")]
    Eol,
}

impl AopState {
    /// Wire representation sent in PATCH bodies.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Active => "active",
            Self::Eol => "EOL",
        }
    }

    /// Label of the action that moves an AOP into this state.
    #[must_use]
    pub const fn action_label(self) -> &'static str {
        match self {
            Self::Draft => "Set Draft",
            Self::Active => "Set Active",
            Self::Eol => "Set EOL",
        }
    }

    /// All states in lifecycle order.
    #[must_use]
    pub const fn all() -> [Self; 3] {
        [Self::Draft, Self::Active, Self::Eol]
    }
}

impl fmt::Display for AopState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no known [`AopState`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown AOP state {0:?} (expected draft, active or EOL)")]
pub struct ParseStateError(pub String);

impl FromStr for AopState {
    type Err = ParseStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "active" => Ok(Self::Active),
            "eol" => Ok(Self::Eol),
            _ => Err(ParseStateError(s.to_string())),
        }
    }
}

/// An Annual Operating Plan: one budget cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aop {
    pub id: AopId,
    pub name: String,
    pub state: AopState,
    /// Planned amount for the cycle, when the backend reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Aop {
    /// Create an AOP with only the required fields set.
    #[must_use]
    pub fn new(id: AopId, name: impl Into<String>, state: AopState) -> Self {
        Self {
            id,
            name: name.into(),
            state,
            total_amount: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Set the planned amount.
    #[must_use]
    pub const fn with_total_amount(mut self, amount: f64) -> Self {
        self.total_amount = Some(amount);
        self
    }
}

/// A monetary allocation attached to one AOP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl Budget {
    /// Create a budget carrying only an amount.
    #[must_use]
    pub const fn with_amount(amount: f64) -> Self {
        Self {
            amount,
            id: None,
            budget_id: None,
            project: None,
            description: None,
            is_active: None,
        }
    }
}

/// Body of `POST /aop`.
#[derive(Debug, Serialize)]
pub(crate) struct CreateAopBody<'a> {
    pub name: &'a str,
}

/// Body of `PATCH /aop/{id}`.
#[derive(Debug, Serialize)]
pub(crate) struct StateChangeBody {
    pub state: AopState,
}
