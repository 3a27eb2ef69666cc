// 📈 Profit Report - the assembled pipeline
// screen → filter → aggregate → search → rank → rollup, each stage a pure
// function of the previous stage's output. Nothing is cached between
// calls; every filter change rebuilds the report from the full
// transaction set.

use crate::aggregation::{AggregationEngine, FinancialRecord};
use crate::entities::EntityRegistry;
use crate::filter::{apply_search, filter_transactions, FilterCriteria};
use crate::ranking::SortState;
use crate::rollup::{rollup, SummaryTotals};
use crate::screening::{screen_transactions, RejectedTransaction};
use crate::store::Transaction;
use serde::Serialize;

// ============================================================================
// PROFIT REPORT
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct ProfitReport {
    pub records: Vec<FinancialRecord>,
    pub totals: SummaryTotals,
    pub generated_at: chrono::DateTime<chrono::Utc>,
    pub transactions_seen: usize,
    pub transactions_rejected: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rejections: Vec<RejectedTransaction>,
}

impl ProfitReport {
    pub fn summary(&self) -> String {
        format!(
            "P&L over {} entities: revenue ${:.2}, payouts ${:.2}, expenses ${:.2}, profit ${:.2} ({} of {} transactions used)",
            self.records.len(),
            self.totals.grand_total_revenue,
            self.totals.grand_total_cost,
            self.totals.grand_total_expenses,
            self.totals.grand_total_profit,
            self.transactions_seen - self.transactions_rejected,
            self.transactions_seen,
        )
    }
}

// ============================================================================
// REPORT BUILDER
// ============================================================================

pub struct ReportBuilder<'a> {
    registry: &'a EntityRegistry,
    engine: AggregationEngine,
    criteria: FilterCriteria,
    sort: Option<SortState>,
}

impl<'a> ReportBuilder<'a> {
    pub fn new(registry: &'a EntityRegistry) -> Self {
        ReportBuilder {
            registry,
            engine: AggregationEngine::new(),
            criteria: FilterCriteria::default(),
            sort: None,
        }
    }

    pub fn engine(mut self, engine: AggregationEngine) -> Self {
        self.engine = engine;
        self
    }

    pub fn criteria(mut self, criteria: FilterCriteria) -> Self {
        self.criteria = criteria;
        self
    }

    pub fn sort(mut self, sort: SortState) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Run the full pipeline over the transaction set. The input slice is
    /// never mutated; the report owns fresh data throughout.
    pub fn build(self, transactions: &[Transaction]) -> ProfitReport {
        let outcome = screen_transactions(transactions);
        let filtered = filter_transactions(&outcome.clean, &self.criteria);
        let aggregated = self.engine.aggregate(&filtered, self.registry);
        let mut records = apply_search(&aggregated, self.criteria.search_term.as_deref());

        if let Some(sort) = self.sort {
            sort.apply(&mut records);
        }

        let totals = rollup(&records);

        ProfitReport {
            records,
            totals,
            generated_at: chrono::Utc::now(),
            transactions_seen: transactions.len(),
            transactions_rejected: outcome.rejected.len(),
            rejections: outcome.rejected,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
