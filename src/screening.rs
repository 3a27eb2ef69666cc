// 🧹 Transaction Screening - fail-closed input hygiene
// Dirty upstream data never reaches the aggregation engine and never
// raises an error: rows with unparsable dates or negative/non-finite
// amounts are quietly set aside, with a reason recorded for diagnostics.

use crate::store::Transaction;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    /// Date failed to parse; the row is excluded rather than defaulted
    /// to today, which would silently move money across periods
    UnparsableDate,

    /// Amount is negative (amounts are magnitudes; direction comes from
    /// the category)
    NegativeAmount,

    /// Amount is NaN or infinite
    NonFiniteAmount,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectedTransaction {
    pub transaction_id: String,
    pub reason: RejectReason,
}

#[derive(Debug, Clone)]
pub struct ScreeningOutcome {
    pub clean: Vec<Transaction>,
    pub rejected: Vec<RejectedTransaction>,
}

impl ScreeningOutcome {
    pub fn rejected_count(&self) -> usize {
        self.rejected.len()
    }
}

fn screen_one(tx: &Transaction) -> Option<RejectReason> {
    if !tx.amount.is_finite() {
        return Some(RejectReason::NonFiniteAmount);
    }
    if tx.amount < 0.0 {
        return Some(RejectReason::NegativeAmount);
    }
    if tx.parse_date().is_none() {
        return Some(RejectReason::UnparsableDate);
    }
    None
}

/// Split a transaction list into clean rows and rejections. Never errors.
pub fn screen_transactions(transactions: &[Transaction]) -> ScreeningOutcome {
    let mut clean = Vec::with_capacity(transactions.len());
    let mut rejected = Vec::new();

    for tx in transactions {
        match screen_one(tx) {
            None => clean.push(tx.clone()),
            Some(reason) => rejected.push(RejectedTransaction {
                transaction_id: tx.id.clone(),
                reason,
            }),
        }
    }

    ScreeningOutcome { clean, rejected }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{TransactionCategory, TransactionStatus};

    fn create_test_transaction(date: &str, amount: f64) -> Transaction {
        Transaction {
            date: date.to_string(),
            description: "Test job".to_string(),
            amount,
            category: TransactionCategory::Payment,
            entity_ref: "tech-1".to_string(),
            status: TransactionStatus::Completed,
            rate_value: None,
            rate_is_percentage: None,
            quote_status: None,
            id: uuid::Uuid::new_v4().to_string(),
            ingested_at: None,
            metadata: Default::default(),
        }
    }

    #[test]
    fn test_clean_rows_pass_through() {
        let transactions = vec![
            create_test_transaction("2025-01-10", 500.0),
            create_test_transaction("01/11/2025", 300.0),
            create_test_transaction("2025-01-12", 0.0), // zero is fine
        ];

        let outcome = screen_transactions(&transactions);

        assert_eq!(outcome.clean.len(), 3);
        assert_eq!(outcome.rejected_count(), 0);
    }

    #[test]
    fn test_unparsable_date_rejected() {
        let transactions = vec![
            create_test_transaction("soon", 500.0),
            create_test_transaction("2025-01-10", 300.0),
        ];

        let outcome = screen_transactions(&transactions);

        assert_eq!(outcome.clean.len(), 1);
        assert_eq!(outcome.rejected.len(), 1);
        assert_eq!(outcome.rejected[0].reason, RejectReason::UnparsableDate);
        assert_eq!(outcome.rejected[0].transaction_id, transactions[0].id);
    }

    #[test]
    fn test_negative_and_non_finite_amounts_rejected() {
        let transactions = vec![
            create_test_transaction("2025-01-10", -10.0),
            create_test_transaction("2025-01-10", f64::NAN),
            create_test_transaction("2025-01-10", f64::INFINITY),
        ];

        let outcome = screen_transactions(&transactions);

        assert!(outcome.clean.is_empty());
        let reasons: Vec<&RejectReason> = outcome.rejected.iter().map(|r| &r.reason).collect();
        assert_eq!(
            reasons,
            vec![
                &RejectReason::NegativeAmount,
                &RejectReason::NonFiniteAmount,
                &RejectReason::NonFiniteAmount,
            ]
        );
    }
}
