// Job Ledger - Core Library
// Financial aggregation & filtering engine for a service-business
// operations dashboard. Exposes all modules for the CLI and tests.

pub mod aggregation;
pub mod entities;
pub mod filter;
pub mod ranking;
pub mod report;
pub mod rollup;
pub mod screening;
pub mod store;

// Re-export commonly used types
pub use aggregation::{
    AggregationEngine, FinancialRecord, DEFAULT_COST_RATIO, ESTIMATED_HOURS_PER_JOB,
};
pub use entities::{
    EntityKind, EntityRecord, EntityRegistry, JobSource, RateStructure, Technician,
};
pub use filter::{
    apply_search, filter_transactions, DateRange, FilterCriteria, FilterState, FilterWatcher,
};
pub use ranking::{sort_records, SortColumn, SortDirection, SortState};
pub use report::{ProfitReport, ReportBuilder};
pub use rollup::{
    expense_breakdown, expense_breakdown_with_shares, rollup, ExpenseBreakdown, SummaryTotals,
    MATERIALS_SHARE, OTHER_SHARE, TRANSPORT_SHARE,
};
pub use screening::{screen_transactions, RejectReason, RejectedTransaction, ScreeningOutcome};
pub use store::{
    get_all_transactions, insert_transactions, load_ledger_csv, parse_ledger_date, setup_database,
    verify_count, Transaction, TransactionCategory, TransactionStatus,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
