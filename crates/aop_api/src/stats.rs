//! Budget figures derived on the client.
//!
//! Nothing here is persisted; the dashboard recomputes it from the budget
//! list on every load.

use crate::model::{Aop, Budget};

/// Share of the total reported as allocated.
pub const ALLOCATED_RATIO: f64 = 0.75;

/// Share of the total reported as remaining.
pub const REMAINING_RATIO: f64 = 0.25;

/// Totals shown on the dashboard cards.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BudgetStats {
    pub total: f64,
    pub allocated: f64,
    pub remaining: f64,
}

impl BudgetStats {
    /// Sum the budget amounts and split the total by the fixed ratios.
    #[must_use]
    pub fn from_budgets(budgets: &[Budget]) -> Self {
        Self::from_total(sum_amounts(budgets))
    }

    /// Split an already-summed total.
    #[must_use]
    pub fn from_total(total: f64) -> Self {
        Self {
            total,
            allocated: total * ALLOCATED_RATIO,
            remaining: total * REMAINING_RATIO,
        }
    }
}

/// Comparison of an AOP's planned amount against its budgets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reconciliation {
    pub aop_amount: f64,
    pub total_budget: f64,
    /// `aop_amount - total_budget`; negative when over budget.
    pub difference: f64,
    pub is_compliant: bool,
}

impl Reconciliation {
    /// Reconcile `aop` against `budgets`.
    ///
    /// Returns `None` when the backend did not report a planned amount.
    /// Budgets explicitly flagged inactive are left out of the sum.
    #[must_use]
    pub fn for_aop(aop: &Aop, budgets: &[Budget]) -> Option<Self> {
        let aop_amount = aop.total_amount?;
        let total_budget: f64 = budgets
            .iter()
            .filter(|b| b.is_active != Some(false))
            .map(|b| b.amount)
            .sum();
        Some(Self {
            aop_amount,
            total_budget,
            difference: aop_amount - total_budget,
            is_compliant: total_budget <= aop_amount,
        })
    }
}

fn sum_amounts(budgets: &[Budget]) -> f64 {
    budgets.iter().map(|b| b.amount).sum()
}
