// 🔎 Filtering - narrow the transaction list before aggregation
// Four independent, composable dimensions: entity-id set, inclusive date
// range (day granularity), status, and a name search that applies AFTER
// aggregation. No dimension mutates its input; each pass returns a fresh
// subset.

use crate::aggregation::FinancialRecord;
use crate::store::{Transaction, TransactionStatus};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::{Arc, RwLock};

// ============================================================================
// FILTER CRITERIA
// ============================================================================

/// Inclusive calendar-date range. Time-of-day is never compared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        DateRange { from, to }
    }

    pub fn single_day(day: NaiveDate) -> Self {
        DateRange {
            from: Some(day),
            to: Some(day),
        }
    }

    /// Whether a date passes this range. A range with no `from` bound is
    /// inert. A transaction whose date cannot be parsed fails closed -
    /// the caller passes None and the row is excluded, never defaulted
    /// to today.
    pub fn contains(&self, date: Option<NaiveDate>) -> bool {
        let from = match self.from {
            Some(from) => from,
            None => return true,
        };
        match date {
            Some(date) => date >= from && self.to.map_or(true, |to| date <= to),
            None => false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Empty set means no entity restriction
    pub entity_ids: HashSet<String>,

    pub date_range: DateRange,

    /// Exact status match when present
    pub status_filter: Option<TransactionStatus>,

    /// Case-insensitive substring match on entity display name.
    /// Applies to aggregated records, not raw transactions.
    pub search_term: Option<String>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_entities<I: IntoIterator<Item = String>>(ids: I) -> Self {
        FilterCriteria {
            entity_ids: ids.into_iter().collect(),
            ..Default::default()
        }
    }

    fn matches_transaction(&self, tx: &Transaction) -> bool {
        if !self.entity_ids.is_empty() && !self.entity_ids.contains(&tx.entity_ref) {
            return false;
        }
        if !self.date_range.contains(tx.parse_date()) {
            return false;
        }
        if let Some(status) = self.status_filter {
            if tx.status != status {
                return false;
            }
        }
        true
    }
}

/// Narrow a transaction list by entity set, date range and status.
/// The input is untouched; the subset is a fresh Vec.
pub fn filter_transactions(transactions: &[Transaction], criteria: &FilterCriteria) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|tx| criteria.matches_transaction(tx))
        .cloned()
        .collect()
}

/// Apply the search dimension to aggregated records (entity display name,
/// case-insensitive substring). An empty or missing term is an identity.
pub fn apply_search(records: &[FinancialRecord], term: Option<&str>) -> Vec<FinancialRecord> {
    let needle = match term {
        Some(t) if !t.trim().is_empty() => t.trim().to_lowercase(),
        _ => return records.to_vec(),
    };

    records
        .iter()
        .filter(|r| r.entity_name.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

// ============================================================================
// FILTER STATE
// Explicitly-owned shared state with a read/update/subscribe contract.
// Consumers hold a clone of the handle; nothing is ambient or global.
// ============================================================================

#[derive(Debug)]
struct FilterInner {
    criteria: FilterCriteria,
    revision: u64,
}

/// Shared, explicitly-owned filter criteria. Every `update` bumps a
/// revision counter so consumers can cheaply detect that a recompute of
/// the report pipeline is due.
#[derive(Debug, Clone)]
pub struct FilterState {
    inner: Arc<RwLock<FilterInner>>,
}

impl FilterState {
    pub fn new(criteria: FilterCriteria) -> Self {
        FilterState {
            inner: Arc::new(RwLock::new(FilterInner {
                criteria,
                revision: 0,
            })),
        }
    }

    /// Snapshot of the current criteria
    pub fn read(&self) -> FilterCriteria {
        self.inner.read().unwrap().criteria.clone()
    }

    pub fn revision(&self) -> u64 {
        self.inner.read().unwrap().revision
    }

    /// Mutate the criteria and bump the revision
    pub fn update<F: FnOnce(&mut FilterCriteria)>(&self, f: F) {
        let mut inner = self.inner.write().unwrap();
        f(&mut inner.criteria);
        inner.revision += 1;
    }

    pub fn subscribe(&self) -> FilterWatcher {
        FilterWatcher {
            inner: Arc::clone(&self.inner),
            seen: self.revision(),
        }
    }
}

impl Default for FilterState {
    fn default() -> Self {
        Self::new(FilterCriteria::default())
    }
}

/// Poll-style subscription to a FilterState
#[derive(Debug)]
pub struct FilterWatcher {
    inner: Arc<RwLock<FilterInner>>,
    seen: u64,
}

impl FilterWatcher {
    /// True once per revision advance since the last call
    pub fn changed(&mut self) -> bool {
        let current = self.inner.read().unwrap().revision;
        if current != self.seen {
            self.seen = current;
            true
        } else {
            false
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
