//! Plant catalog: the mapping from plant name to its descriptive record.
//!
//! Names are the sole identity key, compared exactly as entered (no trimming
//! or case folding). The backend treats "Tomato" and "tomato" as different
//! plants and so do we.

use serde::{Deserialize, Serialize};

/// Where a catalog record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Origin {
    /// Shipped with the backend's static/database catalog.
    #[default]
    Catalog,
    /// Produced by the AI-generation fallback during this session.
    AiGenerated,
}

/// A single plant record. Only the fields the client reasons about are
/// typed; everything else the backend sends (scientific name, spacing,
/// companion plants, ...) rides along opaquely in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlantRecord {
    pub name: String,
    #[serde(default)]
    pub plant_type: String,
    /// Client-side provenance tag, never on the wire.
    #[serde(skip)]
    pub origin: Origin,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl PlantRecord {
    pub fn new(name: &str, plant_type: &str) -> Self {
        Self {
            name: name.to_string(),
            plant_type: plant_type.to_string(),
            origin: Origin::Catalog,
            extra: serde_json::Map::new(),
        }
    }

    pub fn ai_generated(mut self) -> Self {
        self.origin = Origin::AiGenerated;
        self
    }
}

/// In-memory catalog. Insertion order is display order; AI-sourced records
/// append at the end as they are discovered.
#[derive(Debug, Default)]
pub struct CatalogStore {
    records: Vec<PlantRecord>,
    /// Label for the backend's data source ("database", "static", ...),
    /// shown in the header.
    pub source: String,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the full catalog. An unreachable source is the caller's
    /// problem: it calls `load` with an empty list and surfaces the error
    /// as a notification, and the session continues with what it has.
    pub fn load(&mut self, records: Vec<PlantRecord>) {
        self.records = records;
    }

    /// Insert `record` only if its exact name is not already present.
    /// Returns whether insertion happened. A duplicate name is a storage
    /// no-op; the caller still drives selection/visual updates.
    pub fn merge(&mut self, record: PlantRecord) -> bool {
        if self.records.iter().any(|r| r.name == record.name) {
            return false;
        }
        self.records.push(record);
        true
    }

    /// Exact-name lookup. Used to re-validate that an autocomplete choice
    /// still resolves to a real record before reuse.
    pub fn find(&self, name: &str) -> Option<&PlantRecord> {
        self.records.iter().find(|r| r.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlantRecord> {
        self.records.iter()
    }

    /// Instant local search tier: case-insensitive substring match on name
    /// or plant type.
    pub fn filter(&self, query: &str) -> Vec<&PlantRecord> {
        let needle = query.to_lowercase();
        self.records
            .iter()
            .filter(|r| {
                r.name.to_lowercase().contains(&needle)
                    || r.plant_type.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Sorted unique plant types currently in the catalog.
    pub fn types(&self) -> Vec<String> {
        let mut types: Vec<String> = self
            .records
            .iter()
            .map(|r| r.plant_type.clone())
            .collect();
        types.sort();
        types.dedup();
        types
    }
}
