//! Ranking per-region distance results and assembling the output tables.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::types::{BatchOutcome, DistanceRecord};

/// One row of a region lookup: `{ "id": 12, "distance": "3.4 mi" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookupEntry {
    pub id: usize,
    pub distance: String,
}

/// One row of the address audit comparing what was sent with what the
/// provider geocoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub id: usize,
    pub input_address: String,
    pub parsed_address: String,
}

/// Concatenates the records of every fetched batch in batch order and sorts
/// them by ascending distance. The sort is stable, so equal distances keep
/// their batch order. Failed batches contribute nothing.
#[must_use]
pub fn rank_region<I>(outcomes: I) -> Vec<DistanceRecord>
where
    I: IntoIterator<Item = BatchOutcome>,
{
    let mut records: Vec<DistanceRecord> = outcomes
        .into_iter()
        .flat_map(|outcome| match outcome {
            BatchOutcome::Fetched { records, .. } => records,
            BatchOutcome::Failed { .. } => Vec::new(),
        })
        .collect();
    records.sort_by_key(|r| r.distance_value);
    records
}

#[must_use]
pub fn lookup_entries(records: &[DistanceRecord]) -> Vec<LookupEntry> {
    records
        .iter()
        .map(|r| LookupEntry {
            id: r.location_id,
            distance: r.distance_text.clone(),
        })
        .collect()
}

/// Projects records to audit rows ordered by location id.
#[must_use]
pub fn audit_entries(records: &[DistanceRecord]) -> Vec<AuditEntry> {
    let mut entries: Vec<AuditEntry> = records
        .iter()
        .map(|r| AuditEntry {
            id: r.location_id,
            input_address: r.input_address.clone(),
            parsed_address: r.resolved_address.clone(),
        })
        .collect();
    entries.sort_by_key(|e| e.id);
    entries
}

/// What [`LookupBuilder::add_region`] recorded for one region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionSummary {
    pub entries: usize,
    pub audit_captured: bool,
}

/// Final tables handed to the writer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupTables {
    /// Region code → ranked lookup. Serialized in code order, not processing
    /// order; the two agree for the sorted ZCTA boundary file.
    pub regions: BTreeMap<String, Vec<LookupEntry>>,
    /// Address audit from the first region with results; empty if none had any.
    pub audit: Vec<AuditEntry>,
    pub audit_region: Option<String>,
}

/// Accumulates ranked regions and captures the address audit exactly once.
#[derive(Debug, Default)]
pub struct LookupBuilder {
    tables: LookupTables,
}

impl LookupBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a region's ranked records. The first call with a non-empty record
    /// set also fixes the address audit; later regions never replace it.
    pub fn add_region(&mut self, code: &str, ranked: &[DistanceRecord]) -> RegionSummary {
        let audit_captured = self.tables.audit_region.is_none() && !ranked.is_empty();
        if audit_captured {
            self.tables.audit = audit_entries(ranked);
            self.tables.audit_region = Some(code.to_string());
        }

        let entries = lookup_entries(ranked);
        let count = entries.len();
        if self.tables.regions.insert(code.to_string(), entries).is_some() {
            tracing::warn!(region = code, "region appeared twice; keeping the later lookup");
        }

        RegionSummary {
            entries: count,
            audit_captured,
        }
    }

    #[must_use]
    pub fn region_count(&self) -> usize {
        self.tables.regions.len()
    }

    #[must_use]
    pub fn finish(self) -> LookupTables {
        self.tables
    }
}

#[cfg(test)]
#[path = "rank_test.rs"]
mod tests;
