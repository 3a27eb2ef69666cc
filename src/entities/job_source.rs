// 📣 Job Source Entity - where work comes from
// Referral partners, ad channels, repeat customers. Many sources carry no
// declared payment structure at all - those resolve to Unstructured and
// get priced by the default cost ratio.

use crate::entities::rate::RateStructure;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSource {
    /// Stable identity (UUID) - never changes
    pub id: String,

    /// Display name (e.g. "Referral", "Google Ads")
    pub name: String,

    /// Resolved payment structure (Unstructured for bare sources)
    pub rate: RateStructure,
}

impl JobSource {
    pub fn new(name: String, rate: RateStructure) -> Self {
        JobSource {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            rate,
        }
    }

    /// A source with no declared payment terms
    pub fn bare(name: String) -> Self {
        Self::new(name, RateStructure::Unstructured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_source_is_unstructured() {
        let source = JobSource::bare("Referral".to_string());
        assert!(!source.id.is_empty());
        assert!(source.rate.is_unstructured());
    }
}
