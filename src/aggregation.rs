// 📊 Aggregation Engine - per-entity profit & loss
// Turns a flat transaction list into one FinancialRecord per roster entity.
// Pure and deterministic: identical inputs always produce identical output,
// in roster order. The invariant
//     company_profit == total_revenue - entity_cost - expenses
// holds for every record and may be negative (no floor at zero).

use crate::entities::{EntityRegistry, RateStructure};
use crate::store::{Transaction, TransactionCategory, TransactionStatus};
use serde::{Deserialize, Serialize};

/// Estimated hours per job for hourly-rate entities. An explicit
/// approximation - there is no real time tracking upstream.
pub const ESTIMATED_HOURS_PER_JOB: f64 = 2.0;

/// Share of revenue treated as cost for entities with no declared
/// payment structure (e.g. bare referral sources).
pub const DEFAULT_COST_RATIO: f64 = 0.05;

// ============================================================================
// FINANCIAL RECORD
// ============================================================================

/// Derived per-entity summary. Never persisted - recomputed fresh on
/// every filter change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialRecord {
    pub entity_ref: String,
    pub entity_name: String,
    pub total_jobs: usize,
    pub total_revenue: f64,
    /// What is paid out to the entity
    pub entity_cost: f64,
    pub expenses: f64,
    /// Revenue minus the entity's cut minus expenses - the business's net take
    pub company_profit: f64,
}

impl FinancialRecord {
    /// All-zero record for an entity with no matching transactions
    pub fn zeroed(entity_ref: &str, entity_name: &str) -> Self {
        FinancialRecord {
            entity_ref: entity_ref.to_string(),
            entity_name: entity_name.to_string(),
            total_jobs: 0,
            total_revenue: 0.0,
            entity_cost: 0.0,
            expenses: 0.0,
            company_profit: 0.0,
        }
    }

    /// Profit as a percentage of revenue. Short-circuits to 0 on zero
    /// revenue rather than producing NaN/Infinity.
    pub fn profit_margin(&self) -> f64 {
        if self.total_revenue == 0.0 {
            0.0
        } else {
            self.company_profit / self.total_revenue * 100.0
        }
    }
}

// ============================================================================
// AGGREGATION ENGINE
// ============================================================================

pub struct AggregationEngine {
    /// Hours charged per job for hourly-rate entities
    pub hours_per_job: f64,

    /// Revenue share charged as cost for unstructured entities
    pub cost_ratio: f64,

    /// Count only completed payments as jobs/revenue (default true)
    pub completed_payments_only: bool,
}

impl AggregationEngine {
    pub fn new() -> Self {
        AggregationEngine {
            hours_per_job: ESTIMATED_HOURS_PER_JOB,
            cost_ratio: DEFAULT_COST_RATIO,
            completed_payments_only: true,
        }
    }

    pub fn with_hours_per_job(hours_per_job: f64) -> Self {
        AggregationEngine {
            hours_per_job,
            ..Self::new()
        }
    }

    pub fn with_cost_ratio(cost_ratio: f64) -> Self {
        AggregationEngine {
            cost_ratio,
            ..Self::new()
        }
    }

    pub fn include_pending_payments(mut self) -> Self {
        self.completed_payments_only = false;
        self
    }

    /// Compute one FinancialRecord per roster entity, in roster order.
    ///
    /// Inputs are read-only; callers pass the (already screened/filtered)
    /// transaction slice and get a fresh Vec back. Calling twice with
    /// identical inputs yields deep-equal output.
    pub fn aggregate(
        &self,
        transactions: &[Transaction],
        registry: &EntityRegistry,
    ) -> Vec<FinancialRecord> {
        registry
            .all()
            .iter()
            .map(|entity| {
                let payments: Vec<&Transaction> = transactions
                    .iter()
                    .filter(|tx| {
                        tx.entity_ref == entity.id
                            && tx.category == TransactionCategory::Payment
                            && (!self.completed_payments_only
                                || tx.status == TransactionStatus::Completed)
                    })
                    .collect();

                let expense_total: f64 = transactions
                    .iter()
                    .filter(|tx| {
                        tx.entity_ref == entity.id && tx.category == TransactionCategory::Expense
                    })
                    .map(|tx| tx.amount)
                    .sum();

                let total_jobs = payments.len();
                let total_revenue: f64 = payments.iter().map(|tx| tx.amount).sum();

                // Cost is summed per payment transaction, never a single
                // multiply against the total - per-job rate overrides
                // would otherwise be lost.
                let entity_cost: f64 = payments
                    .iter()
                    .map(|tx| self.payment_cost(tx, entity.rate))
                    .sum();

                let company_profit = total_revenue - entity_cost - expense_total;

                FinancialRecord {
                    entity_ref: entity.id.clone(),
                    entity_name: entity.name.clone(),
                    total_jobs,
                    total_revenue,
                    entity_cost,
                    expenses: expense_total,
                    company_profit,
                }
            })
            .collect()
    }

    /// Cost the entity earns on a single payment transaction.
    /// A per-transaction rate override, when present, always wins over
    /// the entity's default rate.
    fn payment_cost(&self, tx: &Transaction, rate: RateStructure) -> f64 {
        if let Some(flat) = tx.flat_override() {
            return flat;
        }
        if let Some(pct) = tx.percentage_override() {
            return tx.amount * pct / 100.0;
        }

        match rate {
            RateStructure::Percentage { rate } => tx.amount * rate / 100.0,
            RateStructure::Flat { rate } => rate,
            RateStructure::Hourly { rate } => self.hours_per_job * rate,
            RateStructure::Unstructured => tx.amount * self.cost_ratio,
        }
    }
}

impl Default for AggregationEngine {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
