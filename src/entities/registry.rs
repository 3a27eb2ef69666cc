// 📇 Entity Registry - uniform view over technicians and job sources
// The engines never care which kind of entity they are pricing; they see
// EntityRecords in a stable, deterministic order (roster order).

use crate::entities::job_source::JobSource;
use crate::entities::rate::RateStructure;
use crate::entities::technician::Technician;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

// ============================================================================
// ENTITY RECORD
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Technician,
    JobSource,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Technician => "technician",
            EntityKind::JobSource => "job_source",
        }
    }
}

/// What the engines see: id, display name, kind, resolved payment structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub id: String,
    pub name: String,
    pub kind: EntityKind,
    pub rate: RateStructure,
}

// ============================================================================
// ROSTER FILE (raw JSON shape before rate resolution)
// ============================================================================

#[derive(Debug, Deserialize)]
struct RosterEntry {
    id: Option<String>,
    name: String,
    payment_type: Option<String>,
    payment_rate: Option<f64>,
    hourly_rate: Option<f64>,
    trade: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RosterFile {
    #[serde(default)]
    technicians: Vec<RosterEntry>,
    #[serde(default)]
    job_sources: Vec<RosterEntry>,
}

// ============================================================================
// ENTITY REGISTRY
// ============================================================================

pub struct EntityRegistry {
    records: Vec<EntityRecord>,
    by_id: HashMap<String, usize>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        EntityRegistry {
            records: Vec::new(),
            by_id: HashMap::new(),
        }
    }

    /// Load a roster from JSON. Rate structures are resolved here, once;
    /// unknown payment types become Unstructured rather than errors.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read roster file: {:?}", path.as_ref()))?;

        let roster: RosterFile =
            serde_json::from_str(&content).context("Failed to parse roster JSON")?;

        let mut registry = EntityRegistry::new();

        for entry in roster.technicians {
            let rate = RateStructure::resolve(
                entry.payment_type.as_deref(),
                entry.payment_rate,
                entry.hourly_rate,
            );
            let mut tech = Technician::new(entry.name, rate);
            if let Some(id) = entry.id {
                tech.id = id;
            }
            tech.trade = entry.trade;
            registry.register_technician(tech);
        }

        for entry in roster.job_sources {
            let rate = RateStructure::resolve(
                entry.payment_type.as_deref(),
                entry.payment_rate,
                entry.hourly_rate,
            );
            let mut source = JobSource::new(entry.name, rate);
            if let Some(id) = entry.id {
                source.id = id;
            }
            registry.register_source(source);
        }

        Ok(registry)
    }

    pub fn register_technician(&mut self, tech: Technician) {
        self.push(EntityRecord {
            id: tech.id,
            name: tech.name,
            kind: EntityKind::Technician,
            rate: tech.rate,
        });
    }

    pub fn register_source(&mut self, source: JobSource) {
        self.push(EntityRecord {
            id: source.id,
            name: source.name,
            kind: EntityKind::JobSource,
            rate: source.rate,
        });
    }

    fn push(&mut self, record: EntityRecord) {
        // Last registration wins for a duplicated id
        if let Some(&idx) = self.by_id.get(&record.id) {
            self.records[idx] = record;
        } else {
            self.by_id.insert(record.id.clone(), self.records.len());
            self.records.push(record);
        }
    }

    pub fn lookup(&self, id: &str) -> Option<&EntityRecord> {
        self.by_id.get(id).map(|&idx| &self.records[idx])
    }

    /// All records in roster order (deterministic)
    pub fn all(&self) -> &[EntityRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_lookup() {
        let mut registry = EntityRegistry::new();

        let tech = Technician::new(
            "Marcus Webb".to_string(),
            RateStructure::Percentage { rate: 20.0 },
        );
        let tech_id = tech.id.clone();
        registry.register_technician(tech);
        registry.register_source(JobSource::bare("Referral".to_string()));

        assert_eq!(registry.len(), 2);

        let found = registry.lookup(&tech_id).unwrap();
        assert_eq!(found.name, "Marcus Webb");
        assert_eq!(found.kind, EntityKind::Technician);
        assert_eq!(found.rate, RateStructure::Percentage { rate: 20.0 });

        assert!(registry.lookup("no-such-id").is_none());
    }

    #[test]
    fn test_roster_order_is_preserved() {
        let mut registry = EntityRegistry::new();
        for name in ["A", "B", "C"] {
            registry.register_source(JobSource::bare(name.to_string()));
        }

        let names: Vec<&str> = registry.all().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_duplicate_id_last_wins() {
        let mut registry = EntityRegistry::new();

        let mut tech = Technician::new(
            "Old Name".to_string(),
            RateStructure::Flat { rate: 100.0 },
        );
        tech.id = "tech-1".to_string();
        registry.register_technician(tech);

        let mut updated = Technician::new(
            "New Name".to_string(),
            RateStructure::Flat { rate: 120.0 },
        );
        updated.id = "tech-1".to_string();
        registry.register_technician(updated);

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.lookup("tech-1").unwrap().name, "New Name");
    }

    #[test]
    fn test_from_file_resolves_rates_once() {
        use std::io::Write;

        let path = std::env::temp_dir().join("jobledger_test_roster.json");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            r#"{{
                "technicians": [
                    {{"id": "tech-1", "name": "Marcus Webb", "payment_type": "percentage", "payment_rate": 20.0, "trade": "plumbing"}},
                    {{"id": "tech-2", "name": "Ana Reyes", "payment_type": "hourly", "hourly_rate": 45.0}}
                ],
                "job_sources": [
                    {{"id": "src-1", "name": "Referral"}},
                    {{"id": "src-2", "name": "Google Ads", "payment_type": "mystery", "payment_rate": 8.0}}
                ]
            }}"#
        )
        .unwrap();
        drop(file);

        let registry = EntityRegistry::from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(registry.len(), 4);
        assert_eq!(
            registry.lookup("tech-1").unwrap().rate,
            RateStructure::Percentage { rate: 20.0 }
        );
        assert_eq!(
            registry.lookup("tech-2").unwrap().rate,
            RateStructure::Hourly { rate: 45.0 }
        );
        // Bare source and unknown payment type both resolve to Unstructured
        assert!(registry.lookup("src-1").unwrap().rate.is_unstructured());
        assert!(registry.lookup("src-2").unwrap().rate.is_unstructured());
    }
}
