// 💰 Rate Structure - how an entity's payout is derived
// The upstream roster data describes payment terms loosely (a payment_type
// string plus whichever rate fields happen to be filled in). We resolve
// that shape ONCE at ingestion into an explicit tagged variant and never
// re-infer it per calculation.

use serde::{Deserialize, Serialize};

/// Resolved payment structure for a technician or job source
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RateStructure {
    /// Entity is paid a percentage of each job's revenue
    Percentage { rate: f64 },

    /// Entity is paid a fixed amount per completed job, independent of revenue
    Flat { rate: f64 },

    /// Entity is paid by the hour; job cost uses an estimated hours-per-job
    /// approximation since there is no real time tracking upstream
    Hourly { rate: f64 },

    /// No declared payment structure (e.g. a bare referral source).
    /// Cost falls back to a default ratio of revenue.
    Unstructured,
}

impl RateStructure {
    /// Resolve raw roster fields into an explicit variant.
    ///
    /// Unknown or missing payment types never error - they resolve to
    /// `Unstructured`, which the aggregation engine prices with its
    /// default cost ratio.
    pub fn resolve(
        payment_type: Option<&str>,
        payment_rate: Option<f64>,
        hourly_rate: Option<f64>,
    ) -> RateStructure {
        match payment_type {
            Some("percentage") => match payment_rate {
                Some(rate) => RateStructure::Percentage { rate },
                None => RateStructure::Unstructured,
            },
            Some("flat") => match payment_rate {
                Some(rate) => RateStructure::Flat { rate },
                None => RateStructure::Unstructured,
            },
            Some("hourly") => match hourly_rate.or(payment_rate) {
                Some(rate) => RateStructure::Hourly { rate },
                None => RateStructure::Unstructured,
            },
            _ => RateStructure::Unstructured,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RateStructure::Percentage { .. } => "percentage",
            RateStructure::Flat { .. } => "flat",
            RateStructure::Hourly { .. } => "hourly",
            RateStructure::Unstructured => "unstructured",
        }
    }

    pub fn is_unstructured(&self) -> bool {
        matches!(self, RateStructure::Unstructured)
    }
}

// ============================================================================
// TESTS
// ============================================================================
