//! Page models.
//!
//! Each route is backed by a struct implementing [`PageModel`], giving the
//! shell one interface for key routing, rendering and enter/leave hooks.
//! Fetch results are delivered to the concrete page types directly.

mod aops;
mod dashboard;
mod placeholder;

use std::sync::Arc;

use aop_api::AopApi;

pub use aops::{AopsPage, Focus, action_enabled};
pub use dashboard::{DashboardData, DashboardPage};
pub use placeholder::PlaceholderPage;

use crate::keys::Key;
use crate::messages::{Msg, Page};
use crate::runtime::Cmd;
use crate::theme::Theme;

/// Interface the shell uses to drive the active page.
pub trait PageModel {
    /// Handle a key the shell did not consume.
    fn handle_key(&mut self, key: Key) -> Option<Cmd<Msg>>;

    /// Render the page body for the given content width.
    fn view(&self, width: usize, theme: &Theme) -> String;

    /// The route this page serves.
    fn page(&self) -> Page;

    /// Key hints for the footer.
    fn hints(&self) -> &'static str {
        ""
    }

    /// Called when the page becomes the active route.
    fn on_enter(&mut self) -> Option<Cmd<Msg>> {
        None
    }

    /// Called when another route replaces this one.
    fn on_leave(&mut self) -> Option<Cmd<Msg>> {
        None
    }

    /// Whether a text field has focus, in which case the shell passes
    /// printable keys through instead of treating them as shortcuts.
    fn captures_text(&self) -> bool {
        false
    }
}

/// Progress of a page's most recent fetch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadStatus {
    /// Nothing requested yet.
    #[default]
    Idle,
    Loading,
    Loaded,
    /// The last fetch failed; the message is shown on the page.
    Failed(String),
}

impl LoadStatus {
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// All page models, one per route.
pub struct Pages {
    pub dashboard: DashboardPage,
    pub aops: AopsPage,
    pub budgets: PlaceholderPage,
    pub users: PlaceholderPage,
}

impl Pages {
    /// Build every page against a shared API handle.
    #[must_use]
    pub fn new(api: &Arc<dyn AopApi>) -> Self {
        Self {
            dashboard: DashboardPage::new(Arc::clone(api)),
            aops: AopsPage::new(Arc::clone(api)),
            budgets: PlaceholderPage::new(Page::Budgets),
            users: PlaceholderPage::new(Page::Users),
        }
    }

    /// The page serving `page`.
    pub fn get(&self, page: Page) -> &dyn PageModel {
        match page {
            Page::Dashboard => &self.dashboard,
            Page::Aops => &self.aops,
            Page::Budgets => &self.budgets,
            Page::Users => &self.users,
        }
    }

    /// Mutable access to the page serving `page`.
    pub fn get_mut(&mut self, page: Page) -> &mut dyn PageModel {
        match page {
            Page::Dashboard => &mut self.dashboard,
            Page::Aops => &mut self.aops,
            Page::Budgets => &mut self.budgets,
            Page::Users => &mut self.users,
        }
    }
}
