//! Dashboard page: budget totals for the active AOP.
//!
//! Entering the page fetches the active AOP and then its budgets inside a
//! single command. The result is tagged with the page generation; leaving
//! the page bumps the generation so a late response cannot overwrite a
//! newer one.

use std::sync::Arc;

use aop_api::{Aop, AopApi, ApiError, Budget, BudgetStats, Reconciliation};
use tracing::{debug, info, warn};

use super::{LoadStatus, PageModel};
use crate::format::usd;
use crate::keys::Key;
use crate::messages::{DashboardMsg, Msg, Page};
use crate::runtime::Cmd;
use crate::theme::{Theme, fit, spacing};

/// What one dashboard load brings back.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardData {
    pub aop: Aop,
    pub budgets: Vec<Budget>,
}

impl DashboardData {
    /// Fetch the active AOP, then its budgets.
    ///
    /// # Errors
    ///
    /// Returns the first failing call's error; budgets are not requested
    /// when the active AOP cannot be fetched.
    pub fn load(api: &dyn AopApi) -> Result<Self, ApiError> {
        let aop = api.active_aop()?;
        let budgets = api.budgets(aop.id)?;
        Ok(Self { aop, budgets })
    }
}

/// Dashboard page model.
pub struct DashboardPage {
    api: Arc<dyn AopApi>,
    generation: u64,
    status: LoadStatus,
    active_aop: Option<Aop>,
    stats: BudgetStats,
    reconciliation: Option<Reconciliation>,
}

impl DashboardPage {
    #[must_use]
    pub fn new(api: Arc<dyn AopApi>) -> Self {
        Self {
            api,
            generation: 0,
            status: LoadStatus::Idle,
            active_aop: None,
            stats: BudgetStats::default(),
            reconciliation: None,
        }
    }

    /// Start a load, superseding any in flight.
    pub fn fetch(&mut self) -> Option<Cmd<Msg>> {
        self.generation += 1;
        self.status = LoadStatus::Loading;
        let generation = self.generation;
        let api = Arc::clone(&self.api);
        debug!(generation, "dashboard fetch started");

        Some(Cmd::task(move || {
            let result = DashboardData::load(api.as_ref());
            Msg::Dashboard(DashboardMsg::Loaded { generation, result })
        }))
    }

    /// Apply a fetch result.
    pub fn update(&mut self, msg: DashboardMsg) {
        match msg {
            DashboardMsg::Loaded { generation, result } => {
                if generation != self.generation {
                    debug!(
                        generation,
                        current = self.generation,
                        "dropping stale dashboard result"
                    );
                    return;
                }
                match result {
                    Ok(data) => {
                        self.stats = BudgetStats::from_budgets(&data.budgets);
                        self.reconciliation = Reconciliation::for_aop(&data.aop, &data.budgets);
                        info!(
                            aop = %data.aop.name,
                            budgets = data.budgets.len(),
                            total = self.stats.total,
                            "dashboard loaded"
                        );
                        self.active_aop = Some(data.aop);
                        self.status = LoadStatus::Loaded;
                    }
                    Err(err) => {
                        warn!(error = %err, "dashboard load failed");
                        self.status = LoadStatus::Failed(err.to_string());
                    }
                }
            }
        }
    }

    #[must_use]
    pub const fn stats(&self) -> BudgetStats {
        self.stats
    }

    #[must_use]
    pub const fn active_aop(&self) -> Option<&Aop> {
        self.active_aop.as_ref()
    }

    #[must_use]
    pub const fn reconciliation(&self) -> Option<Reconciliation> {
        self.reconciliation
    }

    #[must_use]
    pub const fn status(&self) -> &LoadStatus {
        &self.status
    }

    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    fn render_cards(&self, width: usize, theme: &Theme) -> Vec<String> {
        let cards = [
            card("Total Budget", &usd(self.stats.total), theme),
            card("Allocated", &usd(self.stats.allocated), theme),
            card("Remaining", &usd(self.stats.remaining), theme),
        ];

        let row_width = spacing::CARD_WIDTH * 3 + spacing::CARD_GAP * 2;
        if width < row_width {
            return cards.concat();
        }

        let gap = " ".repeat(spacing::CARD_GAP);
        (0..cards[0].len())
            .map(|line| {
                cards
                    .iter()
                    .map(|c| c[line].as_str())
                    .collect::<Vec<_>>()
                    .join(&gap)
            })
            .collect()
    }

    fn render_reconciliation(&self, theme: &Theme) -> Option<String> {
        let rec = self.reconciliation?;
        let verdict = if rec.is_compliant {
            theme.success("within plan")
        } else {
            theme.error("over plan")
        };
        Some(format!(
            "{} {}  {} {}  {} {}  {verdict}",
            theme.muted("Planned:"),
            usd(rec.aop_amount),
            theme.muted("Budgeted:"),
            usd(rec.total_budget),
            theme.muted("Difference:"),
            usd(rec.difference),
        ))
    }
}

/// One bordered stat card as lines of equal display width.
fn card(label: &str, value: &str, theme: &Theme) -> Vec<String> {
    let inner = spacing::CARD_WIDTH - 4;
    let border = "─".repeat(spacing::CARD_WIDTH - 2);
    vec![
        theme.muted(&format!("┌{border}┐")),
        format!(
            "{} {} {}",
            theme.muted("│"),
            theme.strong(&fit(label, inner)),
            theme.muted("│")
        ),
        format!(
            "{} {} {}",
            theme.muted("│"),
            theme.title(&fit(value, inner)),
            theme.muted("│")
        ),
        theme.muted(&format!("└{border}┘")),
    ]
}

impl PageModel for DashboardPage {
    fn handle_key(&mut self, key: Key) -> Option<Cmd<Msg>> {
        match key {
            Key::Char('r') => self.fetch(),
            _ => None,
        }
    }

    fn view(&self, width: usize, theme: &Theme) -> String {
        let mut lines = vec![theme.title(Page::Dashboard.title()), String::new()];

        let summary = match (&self.active_aop, &self.status) {
            (_, LoadStatus::Loading) => theme.muted("Loading..."),
            (Some(aop), _) => format!(
                "{} {} {}",
                theme.muted("Active AOP:"),
                theme.strong(&aop.name),
                theme.muted(&format!("({})", aop.state))
            ),
            (None, _) => theme.muted("No active AOP loaded"),
        };
        lines.push(summary);
        lines.push(String::new());

        lines.extend(self.render_cards(width, theme));

        if let Some(rec) = self.render_reconciliation(theme) {
            lines.push(String::new());
            lines.push(rec);
        }

        if let LoadStatus::Failed(err) = &self.status {
            lines.push(String::new());
            lines.push(theme.error(&format!("Error: {err}")));
        }

        lines.join("\n")
    }

    fn page(&self) -> Page {
        Page::Dashboard
    }

    fn hints(&self) -> &'static str {
        "r refresh"
    }

    fn on_enter(&mut self) -> Option<Cmd<Msg>> {
        self.fetch()
    }

    fn on_leave(&mut self) -> Option<Cmd<Msg>> {
        self.generation += 1;
        if self.status.is_loading() {
            self.status = LoadStatus::Idle;
        }
        None
    }
}
