// Test infrastructure; stylistic lints are relaxed in favor of readable fixtures.
#![allow(clippy::pedantic)]
#![allow(clippy::nursery)]

//! In-memory backend for driving pages and the shell without a network.
//!
//! [`FakeApi`] behaves like the real backend for the five calls the console
//! makes: creates start in draft with the next free id, state changes
//! persist, and every call is appended to a log as `"METHOD path"` so tests
//! can assert on exactly which requests were made.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use aop_api::{Aop, AopApi, AopState};
//! use aop_console::test_support::FakeApi;
//!
//! let api = Arc::new(FakeApi::new());
//! api.add_aop(Aop::new(1, "FY25", AopState::Draft));
//! api.set_budgets(1, &[100.0, 300.0]);
//!
//! assert_eq!(api.aops().unwrap().len(), 1);
//! assert_eq!(api.calls(), ["GET /aop"]);
//! ```

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use aop_api::{Aop, AopApi, AopId, AopState, ApiError, Budget};

#[derive(Debug, Default)]
struct FakeState {
    aops: Vec<Aop>,
    budgets: HashMap<AopId, Vec<Budget>>,
    active: Option<AopId>,
    calls: Vec<String>,
    created: Vec<String>,
    fail_next: Option<u16>,
}

/// In-memory [`AopApi`] with a call log and one-shot failure injection.
#[derive(Debug, Default)]
pub struct FakeApi {
    state: Mutex<FakeState>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Seed an AOP, appended in listing order.
    pub fn add_aop(&self, aop: Aop) {
        self.lock().aops.push(aop);
    }

    /// Pin which AOP `GET /aop/active` returns.
    ///
    /// Without this the first AOP in state `active` is returned.
    pub fn set_active(&self, id: AopId) {
        self.lock().active = Some(id);
    }

    /// Replace the budgets of `aop_id` with plain amounts.
    pub fn set_budgets(&self, aop_id: AopId, amounts: &[f64]) {
        let budgets = amounts.iter().copied().map(Budget::with_amount).collect();
        self.lock().budgets.insert(aop_id, budgets);
    }

    /// Make the next call fail with `status`, whatever it is.
    pub fn fail_next(&self, status: u16) {
        self.lock().fail_next = Some(status);
    }

    /// Calls made so far, as `"METHOD path"`.
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    /// Names passed to `create_aop`, in order.
    pub fn created_names(&self) -> Vec<String> {
        self.lock().created.clone()
    }

    /// Current server-side copy of an AOP.
    pub fn aop(&self, id: AopId) -> Option<Aop> {
        self.lock().aops.iter().find(|a| a.id == id).cloned()
    }

    /// Log the call and take any injected failure.
    fn begin(&self, method: &'static str, path: String) -> Result<MutexGuard<'_, FakeState>, ApiError> {
        let mut state = self.lock();
        state.calls.push(format!("{method} {path}"));
        match state.fail_next.take() {
            Some(status) => Err(ApiError::Status {
                method,
                path,
                status,
                body: String::new(),
            }),
            None => Ok(state),
        }
    }
}

fn not_found(method: &'static str, path: String, body: &str) -> ApiError {
    ApiError::Status {
        method,
        path,
        status: 404,
        body: body.to_string(),
    }
}

impl AopApi for FakeApi {
    fn active_aop(&self) -> Result<Aop, ApiError> {
        let path = "/aop/active".to_string();
        let state = self.begin("GET", path.clone())?;
        let found = match state.active {
            Some(id) => state.aops.iter().find(|a| a.id == id),
            None => state.aops.iter().find(|a| a.state == AopState::Active),
        };
        found
            .cloned()
            .ok_or_else(|| not_found("GET", path, "no active AOP"))
    }

    fn aops(&self) -> Result<Vec<Aop>, ApiError> {
        let state = self.begin("GET", "/aop".to_string())?;
        Ok(state.aops.clone())
    }

    fn budgets(&self, aop_id: AopId) -> Result<Vec<Budget>, ApiError> {
        let state = self.begin("GET", format!("/budgets?aop={aop_id}"))?;
        Ok(state.budgets.get(&aop_id).cloned().unwrap_or_default())
    }

    fn create_aop(&self, name: &str) -> Result<Aop, ApiError> {
        let mut state = self.begin("POST", "/aop".to_string())?;
        state.created.push(name.to_string());
        let id = state.aops.iter().map(|a| a.id).max().unwrap_or(0) + 1;
        let aop = Aop::new(id, name, AopState::Draft);
        state.aops.push(aop.clone());
        Ok(aop)
    }

    fn update_aop_state(&self, aop_id: AopId, new_state: AopState) -> Result<Aop, ApiError> {
        let path = format!("/aop/{aop_id}");
        let mut state = self.begin("PATCH", path.clone())?;
        let aop = state
            .aops
            .iter_mut()
            .find(|a| a.id == aop_id)
            .ok_or_else(|| not_found("PATCH", path, "AOP not found"))?;
        aop.state = new_state;
        Ok(aop.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_assigns_next_id_in_draft() {
        let api = FakeApi::new();
        api.add_aop(Aop::new(4, "FY24", AopState::Eol));
        let created = api.create_aop("FY25").unwrap();
        assert_eq!(created.id, 5);
        assert_eq!(created.state, AopState::Draft);
        assert_eq!(api.aops().unwrap().len(), 2);
    }

    #[test]
    fn active_defaults_to_first_active_state() {
        let api = FakeApi::new();
        api.add_aop(Aop::new(1, "A", AopState::Draft));
        api.add_aop(Aop::new(2, "B", AopState::Active));
        assert_eq!(api.active_aop().unwrap().id, 2);

        api.set_active(1);
        assert_eq!(api.active_aop().unwrap().id, 1);
    }

    #[test]
    fn failure_is_one_shot_and_logged() {
        let api = FakeApi::new();
        api.fail_next(500);
        assert_eq!(api.aops().unwrap_err().status(), Some(500));
        assert!(api.aops().is_ok());
        assert_eq!(api.calls(), ["GET /aop", "GET /aop"]);
    }

    #[test]
    fn patch_unknown_is_not_found() {
        let api = FakeApi::new();
        let err = api.update_aop_state(9, AopState::Active).unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(api.calls(), ["PATCH /aop/9"]);
    }
}
