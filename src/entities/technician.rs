// 🔧 Technician Entity - a crew member or subcontractor
// Name and payment terms are values that can change; the UUID is the
// stable identity transactions reference.

use crate::entities::rate::RateStructure;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Technician {
    /// Stable identity (UUID) - never changes
    pub id: String,

    /// Display name (e.g. "Marcus Webb")
    pub name: String,

    /// Trade, when known (e.g. "plumbing", "electrical")
    pub trade: Option<String>,

    /// Resolved payment structure
    pub rate: RateStructure,
}

impl Technician {
    pub fn new(name: String, rate: RateStructure) -> Self {
        Technician {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            trade: None,
            rate,
        }
    }

    pub fn with_trade(name: String, trade: String, rate: RateStructure) -> Self {
        let mut tech = Self::new(name, rate);
        tech.trade = Some(trade);
        tech
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_technician_gets_uuid() {
        let tech = Technician::new(
            "Marcus Webb".to_string(),
            RateStructure::Percentage { rate: 20.0 },
        );

        assert!(!tech.id.is_empty());
        assert_eq!(tech.trade, None);
        assert_eq!(tech.rate, RateStructure::Percentage { rate: 20.0 });

        // Identity is unique per technician
        let other = Technician::new(
            "Marcus Webb".to_string(),
            RateStructure::Percentage { rate: 20.0 },
        );
        assert_ne!(tech.id, other.id);
    }

    #[test]
    fn test_with_trade() {
        let tech = Technician::with_trade(
            "Ana Reyes".to_string(),
            "electrical".to_string(),
            RateStructure::Hourly { rate: 45.0 },
        );
        assert_eq!(tech.trade.as_deref(), Some("electrical"));
    }
}
