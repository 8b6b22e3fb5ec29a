//! Message taxonomy and the route table.
//!
//! Every state change in the console is the result of one [`Msg`] being
//! applied by `App::update`. Fetch results carry the generation they were
//! issued under so pages can drop stale responses.

use aop_api::{Aop, AopId, AopState, ApiError};

use crate::keys::Key;
use crate::pages::DashboardData;
use crate::runtime::TermEvent;

/// Top-level application message.
#[derive(Debug)]
pub enum Msg {
    /// A key press.
    Key(Key),
    /// Terminal size changed.
    Resize { width: u16, height: u16 },
    /// Switch to another route.
    Navigate(Page),
    /// Result for the dashboard page.
    Dashboard(DashboardMsg),
    /// Result for the AOP management page.
    Aops(AopsMsg),
}

impl From<TermEvent> for Msg {
    fn from(event: TermEvent) -> Self {
        match event {
            TermEvent::Key(key) => Self::Key(key),
            TermEvent::Resize { width, height } => Self::Resize { width, height },
        }
    }
}

/// Dashboard results.
#[derive(Debug)]
pub enum DashboardMsg {
    /// Active AOP and its budgets, or the first failure.
    Loaded {
        generation: u64,
        result: Result<DashboardData, ApiError>,
    },
}

/// AOP management results.
#[derive(Debug)]
pub enum AopsMsg {
    /// The full AOP list.
    Fetched {
        generation: u64,
        result: Result<Vec<Aop>, ApiError>,
    },
    /// A create call finished.
    Created(Result<Aop, ApiError>),
    /// A state change finished.
    StateChanged {
        aop_id: AopId,
        state: AopState,
        result: Result<Aop, ApiError>,
    },
}

/// Routes of the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Page {
    /// `/`: budget totals for the active AOP.
    #[default]
    Dashboard,
    /// `/aop`: list, create and transition AOPs.
    Aops,
    /// `/budgets`: budget management (not built yet).
    Budgets,
    /// `/users`: user management (not built yet).
    Users,
}

impl Page {
    /// Route path.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Dashboard => "/",
            Self::Aops => "/aop",
            Self::Budgets => "/budgets",
            Self::Users => "/users",
        }
    }

    /// Resolve a route path. Trailing slashes are ignored.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        let trimmed = path.trim();
        let normalized = match trimmed.trim_end_matches('/') {
            "" if trimmed.starts_with('/') => "/",
            other => other,
        };
        Self::all().into_iter().find(|page| page.path() == normalized)
    }

    /// Label in the navigation bar.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Aops => "AOPs",
            Self::Budgets => "Budgets",
            Self::Users => "Users",
        }
    }

    /// Heading shown at the top of the page.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Dashboard => "Budget Management Dashboard",
            Self::Aops => "AOP Management",
            Self::Budgets => "Budget Management",
            Self::Users => "User Management",
        }
    }

    /// Number key that jumps to this page.
    #[must_use]
    pub const fn shortcut(self) -> char {
        match self {
            Self::Dashboard => '1',
            Self::Aops => '2',
            Self::Budgets => '3',
            Self::Users => '4',
        }
    }

    /// Page for a number key.
    #[must_use]
    pub const fn from_shortcut(c: char) -> Option<Self> {
        match c {
            '1' => Some(Self::Dashboard),
            '2' => Some(Self::Aops),
            '3' => Some(Self::Budgets),
            '4' => Some(Self::Users),
            _ => None,
        }
    }

    /// All pages in navigation order.
    #[must_use]
    pub const fn all() -> [Self; 4] {
        [Self::Dashboard, Self::Aops, Self::Budgets, Self::Users]
    }
}
