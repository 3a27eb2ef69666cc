// 🧮 Summary Rollup - grand totals across the current record set
// Sums per-entity records into SummaryTotals for the dashboard header,
// plus an illustrative expense-category split for chart consumers.

use crate::aggregation::FinancialRecord;
use serde::{Deserialize, Serialize};

/// Illustrative expense split shares. Upstream data carries no real
/// per-transaction expense categorization yet, so charts get a fixed
/// percentage split - an approximation, replaceable once true categories
/// arrive.
pub const MATERIALS_SHARE: f64 = 0.45;
pub const TRANSPORT_SHARE: f64 = 0.30;
pub const OTHER_SHARE: f64 = 0.25;

// ============================================================================
// SUMMARY TOTALS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryTotals {
    pub grand_total_revenue: f64,
    pub grand_total_cost: f64,
    pub grand_total_expenses: f64,
    pub grand_total_profit: f64,
}

impl SummaryTotals {
    pub fn zeroed() -> Self {
        SummaryTotals {
            grand_total_revenue: 0.0,
            grand_total_cost: 0.0,
            grand_total_expenses: 0.0,
            grand_total_profit: 0.0,
        }
    }

    /// Profit identity across the sums, within floating-point epsilon
    pub fn identity_holds(&self, epsilon: f64) -> bool {
        let expected = self.grand_total_revenue - self.grand_total_cost - self.grand_total_expenses;
        (self.grand_total_profit - expected).abs() < epsilon
    }
}

/// Sum the current record list into grand totals
pub fn rollup(records: &[FinancialRecord]) -> SummaryTotals {
    SummaryTotals {
        grand_total_revenue: records.iter().map(|r| r.total_revenue).sum(),
        grand_total_cost: records.iter().map(|r| r.entity_cost).sum(),
        grand_total_expenses: records.iter().map(|r| r.expenses).sum(),
        grand_total_profit: records.iter().map(|r| r.company_profit).sum(),
    }
}

// ============================================================================
// EXPENSE BREAKDOWN (illustrative)
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExpenseBreakdown {
    pub materials: f64,
    pub transport: f64,
    pub other: f64,
}

impl ExpenseBreakdown {
    pub fn total(&self) -> f64 {
        self.materials + self.transport + self.other
    }
}

/// Fixed-share split of grand expenses for donut/bar charts
pub fn expense_breakdown(totals: &SummaryTotals) -> ExpenseBreakdown {
    expense_breakdown_with_shares(totals, MATERIALS_SHARE, TRANSPORT_SHARE, OTHER_SHARE)
}

/// Same split with caller-supplied shares (expected to sum to 1.0)
pub fn expense_breakdown_with_shares(
    totals: &SummaryTotals,
    materials_share: f64,
    transport_share: f64,
    other_share: f64,
) -> ExpenseBreakdown {
    ExpenseBreakdown {
        materials: totals.grand_total_expenses * materials_share,
        transport: totals.grand_total_expenses * transport_share,
        other: totals.grand_total_expenses * other_share,
    }
}

// ============================================================================
// TESTS
// ============================================================================
