//! Routes that exist in the navigation but have no content yet.

use super::PageModel;
use crate::keys::Key;
use crate::messages::{Msg, Page};
use crate::runtime::Cmd;
use crate::theme::Theme;

/// A titled page with a "coming soon" notice.
pub struct PlaceholderPage {
    page: Page,
}

impl PlaceholderPage {
    #[must_use]
    pub const fn new(page: Page) -> Self {
        Self { page }
    }
}

impl PageModel for PlaceholderPage {
    fn handle_key(&mut self, _key: Key) -> Option<Cmd<Msg>> {
        None
    }

    fn view(&self, _width: usize, theme: &Theme) -> String {
        [
            theme.title(self.page.title()),
            String::new(),
            theme.muted("Coming soon..."),
        ]
        .join("\n")
    }

    fn page(&self) -> Page {
        self.page
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shows_title_and_notice() {
        let page = PlaceholderPage::new(Page::Users);
        let view = page.view(80, &Theme::plain());
        assert!(view.starts_with("User Management"));
        assert!(view.contains("Coming soon..."));
    }

    #[test]
    fn ignores_keys() {
        let mut page = PlaceholderPage::new(Page::Budgets);
        assert!(page.handle_key(Key::Char('r')).is_none());
        assert!(page.on_enter().is_none());
        assert_eq!(page.page(), Page::Budgets);
    }
}
