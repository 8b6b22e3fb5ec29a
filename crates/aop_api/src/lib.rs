#![forbid(unsafe_code)]

//! # AOP API
//!
//! Data model and REST client for the AOP (Annual Operating Plan) budget
//! backend.
//!
//! The backend owns validation, persistence and state-transition rules. This
//! crate only mirrors its wire types, derives the budget figures shown on the
//! dashboard, and performs one HTTP round trip per call.
//!
//! ## Example
//!
//! ```rust,no_run
//! use aop_api::{AopApi, AopState, ClientConfig, HttpClient};
//!
//! # fn main() -> Result<(), aop_api::ApiError> {
//! let client = HttpClient::new(&ClientConfig::default())?;
//! let aop = client.create_aop("FY25")?;
//! client.update_aop_state(aop.id, AopState::Active)?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod model;
pub mod stats;

pub use client::{AopApi, ClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT, HttpClient};
pub use error::ApiError;
pub use model::{Aop, AopId, AopState, Budget, ParseStateError};
pub use stats::{ALLOCATED_RATIO, BudgetStats, REMAINING_RATIO, Reconciliation};
