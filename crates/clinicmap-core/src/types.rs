//! Domain records shared by every pipeline stage.

use serde::Serialize;
use serde_json::{Map, Value};

/// A clinic from the location source with its assigned id.
///
/// Serializes as the original source object with `id` injected as the first
/// key, which is the shape of the `clinics-with-ids.json` document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    pub id: usize,
    /// Destination address sent to the distance-matrix provider.
    #[serde(skip)]
    pub address: String,
    /// Passthrough source fields, in source order.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// A ZIP code tabulation area and its internal point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub code: String,
    /// Latitude exactly as published in the boundary dataset (may carry a leading `+`).
    pub latitude: String,
    pub longitude: String,
}

/// Travel distance from one region's origin to one location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceRecord {
    pub location_id: usize,
    pub distance_text: String,
    /// Provider-reported numeric distance (meters for Google, regardless of unit system).
    pub distance_value: u64,
    pub duration_text: String,
    pub input_address: String,
    pub resolved_address: String,
}

/// Why a destination in an otherwise successful response produced no record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The provider reported `ZERO_RESULTS` for this origin/destination pair.
    NoRoute,
    /// The response carried no row or no element for this destination.
    EmptyResult,
    /// An expected field was missing or had the wrong type.
    Malformed(String),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::NoRoute => f.write_str("no route"),
            SkipReason::EmptyResult => f.write_str("empty result"),
            SkipReason::Malformed(reason) => write!(f, "malformed element: {reason}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedDestination {
    pub location_id: usize,
    pub reason: SkipReason,
}

/// Result of a single distance-matrix request for one (region, batch) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    Fetched {
        records: Vec<DistanceRecord>,
        skipped: Vec<SkippedDestination>,
    },
    /// The request itself failed; no destination in the batch has a record.
    Failed { reason: String },
}

impl BatchOutcome {
    #[must_use]
    pub fn records(&self) -> &[DistanceRecord] {
        match self {
            BatchOutcome::Fetched { records, .. } => records,
            BatchOutcome::Failed { .. } => &[],
        }
    }

    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, BatchOutcome::Failed { .. })
    }
}
