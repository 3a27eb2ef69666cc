// 🏆 Ranking Engine - deterministic ordering of financial records
// Stable sort by a chosen column and direction. Equal-valued records keep
// their relative input order, so repeated sorts over the same data are
// reproducible.

use crate::aggregation::FinancialRecord;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

// ============================================================================
// SORT COLUMN & DIRECTION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortColumn {
    Name,
    TotalJobs,
    TotalRevenue,
    EntityCost,
    Expenses,
    CompanyProfit,
}

impl SortColumn {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortColumn::Name => "name",
            SortColumn::TotalJobs => "total_jobs",
            SortColumn::TotalRevenue => "total_revenue",
            SortColumn::EntityCost => "entity_cost",
            SortColumn::Expenses => "expenses",
            SortColumn::CompanyProfit => "company_profit",
        }
    }

    pub fn parse(s: &str) -> Option<SortColumn> {
        match s {
            "name" => Some(SortColumn::Name),
            "total_jobs" | "jobs" => Some(SortColumn::TotalJobs),
            "total_revenue" | "revenue" => Some(SortColumn::TotalRevenue),
            "entity_cost" | "cost" => Some(SortColumn::EntityCost),
            "expenses" => Some(SortColumn::Expenses),
            "company_profit" | "profit" => Some(SortColumn::CompanyProfit),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flip(&self) -> SortDirection {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

// ============================================================================
// SORTING
// ============================================================================

fn compare_by_column(a: &FinancialRecord, b: &FinancialRecord, column: SortColumn) -> Ordering {
    match column {
        // Case-insensitive name comparison
        SortColumn::Name => a
            .entity_name
            .to_lowercase()
            .cmp(&b.entity_name.to_lowercase()),
        SortColumn::TotalJobs => a.total_jobs.cmp(&b.total_jobs),
        SortColumn::TotalRevenue => a.total_revenue.total_cmp(&b.total_revenue),
        SortColumn::EntityCost => a.entity_cost.total_cmp(&b.entity_cost),
        SortColumn::Expenses => a.expenses.total_cmp(&b.expenses),
        SortColumn::CompanyProfit => a.company_profit.total_cmp(&b.company_profit),
    }
}

/// Stable in-place sort by column and direction
pub fn sort_records(records: &mut [FinancialRecord], column: SortColumn, direction: SortDirection) {
    records.sort_by(|a, b| {
        let ord = compare_by_column(a, b, column);
        match direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
}

// ============================================================================
// SORT STATE
// Column + direction with the table-header toggle contract: clicking the
// active column flips direction, clicking a new column resets to
// Descending (biggest-first).
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SortState {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl SortState {
    pub fn new(column: SortColumn, direction: SortDirection) -> Self {
        SortState { column, direction }
    }

    pub fn select(&mut self, column: SortColumn) {
        if self.column == column {
            self.direction = self.direction.flip();
        } else {
            self.column = column;
            self.direction = SortDirection::Descending;
        }
    }

    pub fn apply(&self, records: &mut [FinancialRecord]) {
        sort_records(records, self.column, self.direction);
    }
}

impl Default for SortState {
    fn default() -> Self {
        SortState {
            column: SortColumn::CompanyProfit,
            direction: SortDirection::Descending,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, jobs: usize, revenue: f64, profit: f64) -> FinancialRecord {
        FinancialRecord {
            entity_ref: name.to_lowercase().replace(' ', "-"),
            entity_name: name.to_string(),
            total_jobs: jobs,
            total_revenue: revenue,
            entity_cost: 0.0,
            expenses: 0.0,
            company_profit: profit,
        }
    }

    #[test]
    fn test_numeric_sort_descending() {
        let mut records = vec![
            record("A", 2, 800.0, 590.0),
            record("B", 5, 2000.0, 1200.0),
            record("C", 1, 150.0, -40.0),
        ];

        sort_records(&mut records, SortColumn::CompanyProfit, SortDirection::Descending);

        let profits: Vec<f64> = records.iter().map(|r| r.company_profit).collect();
        assert_eq!(profits, vec![1200.0, 590.0, -40.0]);
    }

    #[test]
    fn test_ascending_is_exact_reverse_of_descending() {
        let mut asc = vec![
            record("A", 2, 800.0, 590.0),
            record("B", 5, 2000.0, 1200.0),
            record("C", 1, 150.0, -40.0),
            record("D", 3, 900.0, 300.0),
        ];
        let mut desc = asc.clone();

        sort_records(&mut asc, SortColumn::TotalRevenue, SortDirection::Ascending);
        sort_records(&mut desc, SortColumn::TotalRevenue, SortDirection::Descending);

        let reversed: Vec<FinancialRecord> = desc.into_iter().rev().collect();
        assert_eq!(asc, reversed);
    }

    #[test]
    fn test_name_sort_case_insensitive() {
        let mut records = vec![
            record("webb supply", 1, 100.0, 10.0),
            record("Ana Reyes", 1, 100.0, 10.0),
            record("marcus Webb", 1, 100.0, 10.0),
        ];

        sort_records(&mut records, SortColumn::Name, SortDirection::Ascending);

        let names: Vec<&str> = records.iter().map(|r| r.entity_name.as_str()).collect();
        assert_eq!(names, vec!["Ana Reyes", "marcus Webb", "webb supply"]);
    }

    #[test]
    fn test_sort_is_stable_on_equal_values() {
        // Same profit everywhere: input order must survive
        let mut records = vec![
            record("First", 1, 100.0, 50.0),
            record("Second", 2, 200.0, 50.0),
            record("Third", 3, 300.0, 50.0),
        ];

        sort_records(&mut records, SortColumn::CompanyProfit, SortDirection::Descending);

        let names: Vec<&str> = records.iter().map(|r| r.entity_name.as_str()).collect();
        assert_eq!(names, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn test_sort_state_toggle_contract() {
        let mut state = SortState::default();
        assert_eq!(state.column, SortColumn::CompanyProfit);
        assert_eq!(state.direction, SortDirection::Descending);

        // Same column flips direction
        state.select(SortColumn::CompanyProfit);
        assert_eq!(state.direction, SortDirection::Ascending);
        state.select(SortColumn::CompanyProfit);
        assert_eq!(state.direction, SortDirection::Descending);

        // New column resets to descending
        state.select(SortColumn::CompanyProfit);
        state.select(SortColumn::Name);
        assert_eq!(state.column, SortColumn::Name);
        assert_eq!(state.direction, SortDirection::Descending);
    }

    #[test]
    fn test_column_parse_roundtrip() {
        for column in [
            SortColumn::Name,
            SortColumn::TotalJobs,
            SortColumn::TotalRevenue,
            SortColumn::EntityCost,
            SortColumn::Expenses,
            SortColumn::CompanyProfit,
        ] {
            assert_eq!(SortColumn::parse(column.as_str()), Some(column));
        }
        assert_eq!(SortColumn::parse("profit"), Some(SortColumn::CompanyProfit));
        assert_eq!(SortColumn::parse("bogus"), None);
    }
}
