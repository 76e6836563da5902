//! Domain model and pure pipeline stages for the clinic ZIP-code lookup builder.
//!
//! Everything in this crate is free of network I/O: the distance-matrix
//! client lives in `clinicmap-matrix` and the orchestration in `clinicmap-cli`.

pub mod app_config;
pub mod batch;
pub mod config;
pub mod origin;
pub mod rank;
pub mod sources;
pub mod types;

use thiserror::Error;

pub use app_config::{AppConfig, UnitSystem};
pub use batch::{partition, MAX_DESTINATIONS_PER_REQUEST};
pub use config::{load_app_config, load_app_config_from_env};
pub use origin::{resolve_origin, OriginOverrides};
pub use rank::{
    audit_entries, lookup_entries, rank_region, AuditEntry, LookupBuilder, LookupEntry,
    LookupTables, RegionSummary,
};
pub use sources::{assign_ids, regions_from_boundaries, BoundaryCollection};
pub use types::{BatchOutcome, DistanceRecord, Location, Region, SkipReason, SkippedDestination};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read overrides file {path}: {source}")]
    OverridesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse overrides file: {0}")]
    OverridesFileParse(#[from] serde_yaml::Error),

    #[error("invalid override for region {code:?}: {reason}")]
    InvalidOverride { code: String, reason: String },
}

/// Errors raised while turning raw input documents into domain records.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("location source is not a JSON array of objects (element {index} is {kind})")]
    NotAnObject { index: usize, kind: &'static str },

    #[error("location {index} has no string field {field:?}")]
    MissingAddress { index: usize, field: String },

    #[error("boundary source could not be parsed: {0}")]
    BoundaryParse(#[source] serde_json::Error),
}
