//! Headless subcommands: one backend call (or two), plain text out.

use std::io::Write;

use anyhow::{Context, Result};
use aop_api::{AopApi, BudgetStats, Reconciliation};
use tracing::info;

use crate::cli::Command;
use crate::format::usd;
use crate::messages::Page;
use crate::pages::DashboardData;
use crate::theme::fit;

/// Run `command` against `api`, writing results to `out`.
///
/// # Errors
///
/// Returns the backend error with the failing operation as context, or an
/// error if `out` cannot be written.
pub fn run<W: Write>(command: &Command, api: &dyn AopApi, out: &mut W) -> Result<()> {
    match command {
        Command::Aops => {
            let aops = api.aops().context("listing AOPs")?;
            writeln!(out, "{:>6}  {}  STATE", "ID", fit("NAME", 24))?;
            for aop in &aops {
                writeln!(out, "{:>6}  {}  {}", aop.id, fit(&aop.name, 24), aop.state)?;
            }
        }
        Command::Create { name } => {
            let aop = api
                .create_aop(name)
                .with_context(|| format!("creating AOP {name:?}"))?;
            info!(id = aop.id, name = %aop.name, "AOP created");
            writeln!(out, "Created AOP {}: {} ({})", aop.id, aop.name, aop.state)?;
        }
        Command::SetState { id, state } => {
            let aop = api
                .update_aop_state(*id, *state)
                .with_context(|| format!("setting AOP {id} to {state}"))?;
            info!(id = aop.id, state = %aop.state, "AOP state changed");
            writeln!(out, "AOP {}: {} is now {}", aop.id, aop.name, aop.state)?;
        }
        Command::Dashboard => {
            let data = DashboardData::load(api).context("loading dashboard")?;
            let stats = BudgetStats::from_budgets(&data.budgets);
            writeln!(out, "Active AOP: {} ({})", data.aop.name, data.aop.state)?;
            writeln!(out, "Total Budget: {}", usd(stats.total))?;
            writeln!(out, "Allocated: {}", usd(stats.allocated))?;
            writeln!(out, "Remaining: {}", usd(stats.remaining))?;
            if let Some(rec) = Reconciliation::for_aop(&data.aop, &data.budgets) {
                let verdict = if rec.is_compliant { "within plan" } else { "over plan" };
                writeln!(
                    out,
                    "Planned: {}  Difference: {}  ({verdict})",
                    usd(rec.aop_amount),
                    usd(rec.difference)
                )?;
            }
        }
        Command::Routes => routes(out)?,
    }
    Ok(())
}

/// Print the route table. Needs no backend.
///
/// # Errors
///
/// Returns an error if `out` cannot be written.
pub fn routes<W: Write>(out: &mut W) -> Result<()> {
    for page in Page::all() {
        writeln!(out, "{}  {}", fit(page.path(), 10), page.title())?;
    }
    Ok(())
}
