//! Application shell: routing, global keys, nav bar and footer.

use std::sync::Arc;

use aop_api::AopApi;
use tracing::info;

use crate::keys::Key;
use crate::messages::{Msg, Page};
use crate::pages::{PageModel, Pages};
use crate::runtime::{Cmd, Model, batch};
use crate::theme::{Theme, clip, fit, rule, spacing};

const GLOBAL_HINTS: &str = "1-4 pages • ? help • q quit";

/// Top-level model owning every page.
pub struct App {
    theme: Theme,
    current_page: Page,
    pages: Pages,
    width: usize,
    height: usize,
    show_help: bool,
}

impl App {
    /// Build the shell, starting on `start`.
    #[must_use]
    pub fn new(api: Arc<dyn AopApi>, theme: Theme, start: Page) -> Self {
        Self {
            theme,
            current_page: start,
            pages: Pages::new(&api),
            width: 80,
            height: 24,
            show_help: false,
        }
    }

    #[must_use]
    pub const fn current_page(&self) -> Page {
        self.current_page
    }

    #[must_use]
    pub const fn pages(&self) -> &Pages {
        &self.pages
    }

    #[must_use]
    pub const fn show_help(&self) -> bool {
        self.show_help
    }

    /// Switch routes, running the leave and enter hooks.
    fn navigate(&mut self, page: Page) -> Option<Cmd<Msg>> {
        if page == self.current_page {
            return None;
        }
        info!(from = self.current_page.path(), to = page.path(), "navigate");

        let leave_cmd = self.pages.get_mut(self.current_page).on_leave();
        self.current_page = page;
        let enter_cmd = self.pages.get_mut(page).on_enter();

        batch(vec![leave_cmd, enter_cmd])
    }

    fn handle_key(&mut self, key: Key) -> Option<Cmd<Msg>> {
        if key == Key::CtrlC {
            return Some(Cmd::Quit);
        }

        if self.show_help {
            if matches!(key, Key::Char('?') | Key::Esc) {
                self.show_help = false;
            }
            return None;
        }

        if self.pages.get(self.current_page).captures_text() {
            return self.pages.get_mut(self.current_page).handle_key(key);
        }

        match key {
            Key::Char('q') => Some(Cmd::Quit),
            Key::Char('?') => {
                self.show_help = true;
                None
            }
            Key::Char(c) => match Page::from_shortcut(c) {
                Some(target) => self.navigate(target),
                None => self.pages.get_mut(self.current_page).handle_key(key),
            },
            _ => self.pages.get_mut(self.current_page).handle_key(key),
        }
    }

    fn render_nav(&self) -> String {
        let tabs: Vec<String> = Page::all()
            .into_iter()
            .map(|page| {
                let label = format!(" {} {} ", page.shortcut(), page.name());
                if page == self.current_page {
                    self.theme.selected(&label)
                } else {
                    self.theme.muted(&label)
                }
            })
            .collect();
        format!(
            "{}  {}",
            self.theme.title("AOP Console"),
            tabs.join(" ")
        )
    }

    fn render_footer(&self) -> String {
        let page_hints = self.pages.get(self.current_page).hints();
        let hints = if page_hints.is_empty() {
            format!(" {}", self.current_page.path())
        } else {
            format!(" {} • {page_hints}", self.current_page.path())
        };
        self.theme.muted(&format!("{hints}  |  {GLOBAL_HINTS}"))
    }

    fn render_help(&self) -> String {
        let text = [
            "Keyboard Shortcuts",
            "",
            "1-4        Jump to page",
            "?          Toggle this help",
            "q          Quit (outside text input)",
            "Ctrl+C     Quit",
            "",
            "AOP Management",
            "tab        Switch input / list",
            "j/k        Move selection",
            "d / a / e  Set Draft / Active / EOL",
            "r          Refresh",
            "",
            "Press ? or Esc to close",
        ];
        let inner = text.iter().map(|l| l.len()).max().unwrap_or(0) + 2;
        let pad = " ".repeat(self.width.saturating_sub(inner + 2) / 2);

        let border = "─".repeat(inner);
        let mut lines = vec![format!("{pad}{}", self.theme.muted(&format!("┌{border}┐")))];
        for line in text {
            lines.push(format!(
                "{pad}{} {} {}",
                self.theme.muted("│"),
                self.theme.text(&fit(line, inner - 2)),
                self.theme.muted("│")
            ));
        }
        lines.push(format!("{pad}{}", self.theme.muted(&format!("└{border}┘"))));
        lines.join("\n")
    }
}

impl Model for App {
    type Msg = Msg;

    fn init(&mut self) -> Option<Cmd<Msg>> {
        info!(route = self.current_page.path(), "starting");
        self.pages.get_mut(self.current_page).on_enter()
    }

    fn update(&mut self, msg: Msg) -> Option<Cmd<Msg>> {
        match msg {
            Msg::Resize { width, height } => {
                self.width = usize::from(width);
                self.height = usize::from(height);
                None
            }
            Msg::Key(key) => self.handle_key(key),
            Msg::Navigate(page) => self.navigate(page),
            Msg::Dashboard(msg) => {
                self.pages.dashboard.update(msg);
                None
            }
            Msg::Aops(msg) => self.pages.aops.update(msg),
        }
    }

    fn view(&self) -> String {
        let body = if self.show_help {
            self.render_help()
        } else {
            self.pages.get(self.current_page).view(self.width, &self.theme)
        };

        let content_height = self
            .height
            .saturating_sub(spacing::NAV_HEIGHT + spacing::FOOTER_HEIGHT);
        let mut content: Vec<&str> = body.lines().take(content_height).collect();
        content.resize(content_height, "");

        let divider = self.theme.muted(&rule(self.width));
        let mut lines = vec![self.render_nav(), divider.clone()];
        lines.extend(content.into_iter().map(str::to_string));
        lines.push(divider);
        lines.push(self.render_footer());
        lines
            .iter()
            .map(|line| clip(line, self.width))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::Simulator;
    use crate::test_support::FakeApi;
    use crate::theme::visible_width;

    fn sim(start: Page) -> (Arc<FakeApi>, Simulator<App>) {
        let api = Arc::new(FakeApi::new());
        let app = App::new(api.clone(), Theme::plain(), start);
        let mut sim = Simulator::new(app);
        sim.init(100, 30);
        (api, sim)
    }

    #[test]
    fn init_enters_start_page() {
        let (api, sim) = sim(Page::Aops);
        assert_eq!(sim.model().current_page(), Page::Aops);
        assert_eq!(api.calls(), ["GET /aop"]);
    }

    #[test]
    fn number_keys_navigate() {
        let (api, mut sim) = sim(Page::Dashboard);
        sim.press(Key::Char('2'));
        assert_eq!(sim.model().current_page(), Page::Aops);
        sim.press(Key::Char('3'));
        assert_eq!(sim.model().current_page(), Page::Budgets);
        sim.press(Key::Char('4'));
        assert_eq!(sim.model().current_page(), Page::Users);
        sim.press(Key::Char('1'));
        assert_eq!(sim.model().current_page(), Page::Dashboard);
        assert_eq!(
            api.calls(),
            ["GET /aop/active", "GET /aop", "GET /aop/active"]
        );
    }

    #[test]
    fn same_page_navigation_is_noop() {
        let (api, mut sim) = sim(Page::Aops);
        sim.send(Msg::Navigate(Page::Aops));
        assert_eq!(api.calls(), ["GET /aop"]);
    }

    #[test]
    fn view_has_nav_and_footer() {
        let (_, sim) = sim(Page::Users);
        let view = sim.view();
        let lines: Vec<_> = view.lines().collect();
        assert_eq!(lines.len(), 30);
        assert!(lines[0].contains("1 Dashboard"));
        assert!(lines[0].contains("2 AOPs"));
        assert!(view.contains("User Management"));
        assert!(lines[29].contains("/users"));
        assert!(lines[29].contains("q quit"));
    }

    #[test]
    fn q_quits_outside_input() {
        let (_, mut sim) = sim(Page::Dashboard);
        sim.press(Key::Char('q'));
        assert!(sim.quit_requested());
    }

    #[test]
    fn q_is_typed_into_focused_input() {
        let (_, mut sim) = sim(Page::Aops);
        sim.press(Key::Tab);
        sim.type_text("q2");
        assert!(!sim.quit_requested());
        assert_eq!(sim.model().current_page(), Page::Aops);
        assert_eq!(sim.model().pages().aops.input(), "q2");
    }

    #[test]
    fn ctrl_c_always_quits() {
        let (_, mut sim) = sim(Page::Aops);
        sim.press(Key::Tab);
        sim.press(Key::CtrlC);
        assert!(sim.quit_requested());
    }

    #[test]
    fn help_toggles_and_swallows_keys() {
        let (_, mut sim) = sim(Page::Dashboard);
        sim.press(Key::Char('?'));
        assert!(sim.model().show_help());
        assert!(sim.view().contains("Keyboard Shortcuts"));

        sim.press(Key::Char('2'));
        assert_eq!(sim.model().current_page(), Page::Dashboard);

        sim.press(Key::Esc);
        assert!(!sim.model().show_help());
    }

    #[test]
    fn styled_lines_are_clipped_to_width() {
        let api = Arc::new(FakeApi::new());
        let mut sim = Simulator::new(App::new(api, Theme::dark(), Page::Aops));
        sim.init(80, 24);
        let view = sim.view();
        let footer = view.lines().last().unwrap();
        assert_eq!(visible_width(footer), 80);
        assert!(footer.ends_with("…\x1b[0m"));
        for line in view.lines() {
            assert!(visible_width(line) <= 80, "too wide: {line:?}");
        }
    }

    #[test]
    fn resize_updates_layout() {
        let (_, mut sim) = sim(Page::Users);
        sim.send(Msg::Resize {
            width: 60,
            height: 10,
        });
        assert_eq!(sim.view().lines().count(), 10);
    }
}
