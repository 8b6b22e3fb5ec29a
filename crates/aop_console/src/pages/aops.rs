//! AOP management page: list, create and transition AOPs.

use std::sync::Arc;

use aop_api::{Aop, AopApi, AopId, AopState};
use tracing::{debug, info, warn};

use super::{LoadStatus, PageModel};
use crate::keys::Key;
use crate::messages::{AopsMsg, Msg, Page};
use crate::runtime::Cmd;
use crate::theme::{Theme, fit};

/// Which part of the page receives keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    List,
    Input,
}

/// Whether moving `aop` to `target` is offered.
///
/// An action is disabled when the AOP is already in the target state.
#[must_use]
pub fn action_enabled(aop: &Aop, target: AopState) -> bool {
    aop.state != target
}

const NAME_COLUMN: usize = 20;

/// AOP management page model.
pub struct AopsPage {
    api: Arc<dyn AopApi>,
    generation: u64,
    aops: Vec<Aop>,
    cursor: usize,
    input: String,
    focus: Focus,
    status: LoadStatus,
    /// Last create or state-change failure.
    action_error: Option<String>,
    /// Between `on_enter` and `on_leave`.
    active: bool,
}

impl AopsPage {
    #[must_use]
    pub fn new(api: Arc<dyn AopApi>) -> Self {
        Self {
            api,
            generation: 0,
            aops: Vec::new(),
            cursor: 0,
            input: String::new(),
            focus: Focus::default(),
            status: LoadStatus::Idle,
            action_error: None,
            active: false,
        }
    }

    /// Replace the list with the server's. Supersedes any fetch in flight.
    pub fn fetch_aops(&mut self) -> Option<Cmd<Msg>> {
        self.generation += 1;
        self.status = LoadStatus::Loading;
        let generation = self.generation;
        let api = Arc::clone(&self.api);
        debug!(generation, "aop list fetch started");

        Some(Cmd::task(move || {
            Msg::Aops(AopsMsg::Fetched {
                generation,
                result: api.aops(),
            })
        }))
    }

    /// Create an AOP named after the current input, sent as typed.
    pub fn create_aop(&mut self) -> Option<Cmd<Msg>> {
        let name = self.input.clone();
        let api = Arc::clone(&self.api);
        info!(name = %name, "creating AOP");

        Some(Cmd::task(move || Msg::Aops(AopsMsg::Created(api.create_aop(&name)))))
    }

    /// Move the AOP `aop_id` to `state`.
    ///
    /// Returns `None` without sending anything when the AOP is unknown or
    /// already in `state`.
    pub fn change_state(&mut self, aop_id: AopId, state: AopState) -> Option<Cmd<Msg>> {
        let aop = self.aops.iter().find(|a| a.id == aop_id)?;
        if !action_enabled(aop, state) {
            debug!(aop_id, %state, "state change ignored, already in state");
            return None;
        }
        let api = Arc::clone(&self.api);
        info!(aop_id, %state, "changing AOP state");

        Some(Cmd::task(move || {
            Msg::Aops(AopsMsg::StateChanged {
                aop_id,
                state,
                result: api.update_aop_state(aop_id, state),
            })
        }))
    }

    /// Apply a result message.
    pub fn update(&mut self, msg: AopsMsg) -> Option<Cmd<Msg>> {
        match msg {
            AopsMsg::Fetched { generation, result } => {
                if generation != self.generation {
                    debug!(
                        generation,
                        current = self.generation,
                        "dropping stale aop list"
                    );
                    return None;
                }
                match result {
                    Ok(aops) => {
                        debug!(count = aops.len(), "aop list loaded");
                        self.aops = aops;
                        self.cursor = self.cursor.min(self.aops.len().saturating_sub(1));
                        self.status = LoadStatus::Loaded;
                    }
                    Err(err) => {
                        warn!(error = %err, "aop list fetch failed");
                        self.status = LoadStatus::Failed(err.to_string());
                    }
                }
                None
            }
            AopsMsg::Created(result) => {
                match result {
                    Ok(aop) => {
                        info!(id = aop.id, name = %aop.name, "AOP created");
                        self.input.clear();
                        self.action_error = None;
                    }
                    Err(err) => {
                        warn!(error = %err, "AOP create failed");
                        self.action_error = Some(format!("Create failed: {err}"));
                    }
                }
                self.refetch_after_mutation()
            }
            AopsMsg::StateChanged {
                aop_id,
                state,
                result,
            } => {
                match result {
                    Ok(_) => {
                        info!(aop_id, %state, "AOP state changed");
                        self.action_error = None;
                    }
                    Err(err) => {
                        warn!(aop_id, %state, error = %err, "AOP state change failed");
                        self.action_error = Some(format!("{} failed: {err}", state.action_label()));
                    }
                }
                self.refetch_after_mutation()
            }
        }
    }

    /// Reload the list after a create or state change, unless the page was
    /// left while the mutation was in flight. `on_enter` reloads anyway.
    fn refetch_after_mutation(&mut self) -> Option<Cmd<Msg>> {
        if !self.active {
            debug!("page inactive, skipping refetch");
            return None;
        }
        self.fetch_aops()
    }

    #[must_use]
    pub fn aops(&self) -> &[Aop] {
        &self.aops
    }

    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    #[must_use]
    pub const fn focus(&self) -> Focus {
        self.focus
    }

    #[must_use]
    pub const fn status(&self) -> &LoadStatus {
        &self.status
    }

    #[must_use]
    pub fn action_error(&self) -> Option<&str> {
        self.action_error.as_deref()
    }

    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// The AOP under the cursor.
    #[must_use]
    pub fn selected(&self) -> Option<&Aop> {
        self.aops.get(self.cursor)
    }

    fn change_selected(&mut self, state: AopState) -> Option<Cmd<Msg>> {
        let id = self.selected()?.id;
        self.change_state(id, state)
    }

    fn handle_input_key(&mut self, key: Key) -> Option<Cmd<Msg>> {
        match key {
            Key::Char(c) => self.input.push(c),
            Key::Backspace => {
                self.input.pop();
            }
            Key::Enter => return self.create_aop(),
            Key::Esc | Key::Tab | Key::BackTab => self.focus = Focus::List,
            _ => {}
        }
        None
    }

    fn handle_list_key(&mut self, key: Key) -> Option<Cmd<Msg>> {
        match key {
            Key::Tab | Key::BackTab => self.focus = Focus::Input,
            Key::Char('j') | Key::Down => {
                if self.cursor + 1 < self.aops.len() {
                    self.cursor += 1;
                }
            }
            Key::Char('k') | Key::Up => self.cursor = self.cursor.saturating_sub(1),
            Key::Home => self.cursor = 0,
            Key::End => self.cursor = self.aops.len().saturating_sub(1),
            Key::Char('d') => return self.change_selected(AopState::Draft),
            Key::Char('a') => return self.change_selected(AopState::Active),
            Key::Char('e') => return self.change_selected(AopState::Eol),
            Key::Char('r') => return self.fetch_aops(),
            _ => {}
        }
        None
    }

    fn render_input(&self, theme: &Theme) -> String {
        let field = if self.focus == Focus::Input {
            theme.selected(&format!("{}▏", self.input))
        } else if self.input.is_empty() {
            theme.muted("AOP name")
        } else {
            theme.text(&self.input)
        };
        format!("{} {field}", theme.strong("Name:"))
    }

    fn render_row(&self, index: usize, aop: &Aop, theme: &Theme) -> String {
        let selected = index == self.cursor && self.focus == Focus::List;
        let marker = if selected { "›" } else { " " };
        let name = fit(&aop.name, NAME_COLUMN);
        let name = if selected {
            theme.selected(&name)
        } else {
            theme.text(&name)
        };

        let buttons: Vec<String> = AopState::all()
            .into_iter()
            .map(|state| {
                let label = format!("[{}]", state.action_label());
                if action_enabled(aop, state) {
                    theme.text(&label)
                } else {
                    theme.disabled(&label)
                }
            })
            .collect();

        format!(
            "{marker} {name} {} {}  {}",
            theme.muted("Current State:"),
            theme.strong(&fit(aop.state.as_str(), 6)),
            buttons.join(" ")
        )
    }
}

impl PageModel for AopsPage {
    fn handle_key(&mut self, key: Key) -> Option<Cmd<Msg>> {
        match self.focus {
            Focus::Input => self.handle_input_key(key),
            Focus::List => self.handle_list_key(key),
        }
    }

    fn view(&self, _width: usize, theme: &Theme) -> String {
        let mut lines = vec![
            theme.title(Page::Aops.title()),
            String::new(),
            theme.strong("Create New AOP"),
            self.render_input(theme),
        ];
        if let Some(err) = &self.action_error {
            lines.push(theme.error(err));
        }
        lines.push(String::new());

        match &self.status {
            LoadStatus::Loading if self.aops.is_empty() => lines.push(theme.muted("Loading...")),
            LoadStatus::Failed(err) => lines.push(theme.error(&format!("Error: {err}"))),
            _ => {}
        }

        if self.aops.is_empty() && matches!(self.status, LoadStatus::Loaded) {
            lines.push(theme.muted("No AOPs yet"));
        }
        for (index, aop) in self.aops.iter().enumerate() {
            lines.push(self.render_row(index, aop, theme));
        }

        lines.join("\n")
    }

    fn page(&self) -> Page {
        Page::Aops
    }

    fn hints(&self) -> &'static str {
        match self.focus {
            Focus::Input => "enter create • esc list • tab list",
            Focus::List => "j/k move • d draft • a active • e EOL • r refresh • tab new AOP",
        }
    }

    fn on_enter(&mut self) -> Option<Cmd<Msg>> {
        self.active = true;
        self.fetch_aops()
    }

    fn on_leave(&mut self) -> Option<Cmd<Msg>> {
        self.active = false;
        self.generation += 1;
        if self.status.is_loading() {
            self.status = LoadStatus::Idle;
        }
        self.focus = Focus::List;
        None
    }

    fn captures_text(&self) -> bool {
        self.focus == Focus::Input
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeApi;

    fn page_with(aops: &[(&str, AopState)]) -> (Arc<FakeApi>, AopsPage) {
        let api = FakeApi::new();
        for (i, (name, state)) in aops.iter().enumerate() {
            api.add_aop(Aop::new(i as u64 + 1, *name, *state));
        }
        let api = Arc::new(api);
        let mut page = AopsPage::new(api.clone());
        let cmd = page.on_enter();
        drive(&mut page, cmd);
        (api, page)
    }

    fn drive(page: &mut AopsPage, cmd: Option<Cmd<Msg>>) {
        let mut pending: Vec<Msg> = cmd.map(Cmd::run_sync).unwrap_or_default();
        while let Some(msg) = pending.pop() {
            let Msg::Aops(msg) = msg else {
                panic!("unexpected message {msg:?}");
            };
            if let Some(next) = page.update(msg) {
                pending.extend(next.run_sync());
            }
        }
    }

    fn press(page: &mut AopsPage, key: Key) {
        let cmd = page.handle_key(key);
        drive(page, cmd);
    }

    #[test]
    fn action_enabled_only_for_other_states() {
        let aop = Aop::new(1, "FY25", AopState::Draft);
        assert!(!action_enabled(&aop, AopState::Draft));
        assert!(action_enabled(&aop, AopState::Active));
        assert!(action_enabled(&aop, AopState::Eol));
    }

    #[test]
    fn enter_fetches_list_in_backend_order() {
        let (api, page) = page_with(&[("FY25", AopState::Draft), ("FY24", AopState::Eol)]);
        let names: Vec<_> = page.aops().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["FY25", "FY24"]);
        assert_eq!(page.status(), &LoadStatus::Loaded);
        assert_eq!(api.calls(), ["GET /aop"]);
    }

    #[test]
    fn create_clears_input_and_refetches() {
        let (api, mut page) = page_with(&[]);
        press(&mut page, Key::Tab);
        assert!(page.captures_text());
        for c in "Q1-2025".chars() {
            press(&mut page, Key::Char(c));
        }
        assert_eq!(page.input(), "Q1-2025");

        press(&mut page, Key::Enter);

        assert_eq!(page.input(), "");
        assert_eq!(page.aops().len(), 1);
        assert_eq!(page.aops()[0].name, "Q1-2025");
        assert_eq!(page.aops()[0].state, AopState::Draft);
        assert_eq!(api.calls(), ["GET /aop", "POST /aop", "GET /aop"]);
    }

    #[test]
    fn failed_create_keeps_input_and_still_refetches() {
        let (api, mut page) = page_with(&[("FY25", AopState::Draft)]);
        press(&mut page, Key::Tab);
        press(&mut page, Key::Char('X'));
        api.fail_next(500);
        press(&mut page, Key::Enter);

        assert_eq!(page.input(), "X");
        assert!(page.action_error().unwrap().contains("HTTP 500"));
        assert_eq!(api.calls(), ["GET /aop", "POST /aop", "GET /aop"]);
    }

    #[test]
    fn empty_name_is_sent() {
        let (api, mut page) = page_with(&[]);
        press(&mut page, Key::Tab);
        press(&mut page, Key::Enter);
        assert_eq!(api.created_names(), [""]);
    }

    #[test]
    fn backspace_and_escape_in_input() {
        let (_, mut page) = page_with(&[]);
        press(&mut page, Key::Tab);
        press(&mut page, Key::Char('a'));
        press(&mut page, Key::Char('b'));
        press(&mut page, Key::Backspace);
        assert_eq!(page.input(), "a");

        press(&mut page, Key::Esc);
        assert_eq!(page.focus(), Focus::List);
        assert!(!page.captures_text());
        assert_eq!(page.input(), "a");
    }

    #[test]
    fn activate_flips_enabled_actions() {
        let (api, mut page) = page_with(&[("FY25", AopState::Draft)]);
        press(&mut page, Key::Char('a'));

        let aop = &page.aops()[0];
        assert_eq!(aop.state, AopState::Active);
        assert!(!action_enabled(aop, AopState::Active));
        assert!(action_enabled(aop, AopState::Draft));
        assert_eq!(api.calls(), ["GET /aop", "PATCH /aop/1", "GET /aop"]);
    }

    #[test]
    fn disabled_action_sends_nothing() {
        let (api, mut page) = page_with(&[("FY25", AopState::Draft)]);
        press(&mut page, Key::Char('d'));
        assert_eq!(api.calls(), ["GET /aop"]);
        assert!(page.change_state(1, AopState::Draft).is_none());
        assert!(page.change_state(99, AopState::Active).is_none());
    }

    #[test]
    fn failed_state_change_shows_error_and_refetches() {
        let (api, mut page) = page_with(&[("FY25", AopState::Draft)]);
        api.fail_next(409);
        press(&mut page, Key::Char('e'));

        assert_eq!(page.aops()[0].state, AopState::Draft);
        let err = page.action_error().unwrap();
        assert!(err.starts_with("Set EOL failed"), "{err}");
        assert_eq!(api.calls(), ["GET /aop", "PATCH /aop/1", "GET /aop"]);
    }

    #[test]
    fn mutation_finishing_after_leave_does_not_refetch() {
        let (api, mut page) = page_with(&[("FY25", AopState::Draft)]);
        let change = page.handle_key(Key::Char('a'));
        assert!(page.on_leave().is_none());
        drive(&mut page, change);
        assert_eq!(api.calls(), ["GET /aop", "PATCH /aop/1"]);

        // Re-enter without running the fetch, start a create, leave again.
        let _fetch = page.on_enter();
        let create = page.create_aop();
        assert!(page.on_leave().is_none());
        drive(&mut page, create);
        assert_eq!(api.calls(), ["GET /aop", "PATCH /aop/1", "POST /aop"]);
        assert_eq!(page.aops()[0].state, AopState::Draft);
    }

    #[test]
    fn cursor_moves_and_targets_selected_row() {
        let (api, mut page) = page_with(&[
            ("FY24", AopState::Active),
            ("FY25", AopState::Draft),
        ]);
        press(&mut page, Key::Char('j'));
        press(&mut page, Key::Down);
        assert_eq!(page.cursor(), 1);
        press(&mut page, Key::Char('e'));
        assert_eq!(page.aops()[1].state, AopState::Eol);
        assert_eq!(page.aops()[0].state, AopState::Active);
        assert!(api.calls().contains(&"PATCH /aop/2".to_string()));

        press(&mut page, Key::Up);
        press(&mut page, Key::Char('k'));
        assert_eq!(page.cursor(), 0);
    }

    #[test]
    fn cursor_clamped_when_list_shrinks() {
        let (_, mut page) = page_with(&[("A", AopState::Draft), ("B", AopState::Draft)]);
        press(&mut page, Key::End);
        assert_eq!(page.cursor(), 1);

        page.update(AopsMsg::Fetched {
            generation: page.generation(),
            result: Ok(vec![Aop::new(1, "A", AopState::Draft)]),
        });
        assert_eq!(page.cursor(), 0);
    }

    #[test]
    fn stale_list_is_dropped() {
        let (_, mut page) = page_with(&[("FY25", AopState::Draft)]);
        let stale = page.generation();
        page.on_leave();

        page.update(AopsMsg::Fetched {
            generation: stale,
            result: Ok(Vec::new()),
        });
        assert_eq!(page.aops().len(), 1);
    }

    #[test]
    fn fetch_failure_is_shown() {
        let (api, mut page) = page_with(&[("FY25", AopState::Draft)]);
        api.fail_next(502);
        press(&mut page, Key::Char('r'));
        assert!(matches!(page.status(), LoadStatus::Failed(_)));
        assert_eq!(page.aops().len(), 1);
        assert!(page.view(80, &Theme::plain()).contains("Error: GET /aop returned HTTP 502"));
    }

    #[test]
    fn view_lists_rows_with_actions() {
        let (_, page) = page_with(&[("FY25", AopState::Draft)]);
        let view = page.view(100, &Theme::plain());
        assert!(view.contains("AOP Management"));
        assert!(view.contains("Create New AOP"));
        assert!(view.contains("FY25"));
        assert!(view.contains("Current State: draft"));
        assert!(view.contains("[Set Draft] [Set Active] [Set EOL]"));
    }

    #[test]
    fn empty_list_message() {
        let (_, page) = page_with(&[]);
        assert!(page.view(80, &Theme::plain()).contains("No AOPs yet"));
    }
}
