use std::path::PathBuf;

/// Unit system requested from the distance-matrix provider.
///
/// Only affects the human-readable `text` fields; numeric distance values are
/// always reported in meters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnitSystem {
    #[default]
    Imperial,
    Metric,
}

impl UnitSystem {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            UnitSystem::Imperial => "imperial",
            UnitSystem::Metric => "metric",
        }
    }
}

impl std::fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub google_maps_api_key: String,
    pub log_level: String,
    pub locations_url: String,
    pub address_field: String,
    pub boundary_path: PathBuf,
    pub overrides_path: Option<PathBuf>,
    pub state_prefix: String,
    pub output_dir: PathBuf,
    pub units: UnitSystem,
    pub batch_size: usize,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub region_offset: usize,
    pub region_limit: Option<usize>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("google_maps_api_key", &"[redacted]")
            .field("log_level", &self.log_level)
            .field("locations_url", &self.locations_url)
            .field("address_field", &self.address_field)
            .field("boundary_path", &self.boundary_path)
            .field("overrides_path", &self.overrides_path)
            .field("state_prefix", &self.state_prefix)
            .field("output_dir", &self.output_dir)
            .field("units", &self.units)
            .field("batch_size", &self.batch_size)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("region_offset", &self.region_offset)
            .field("region_limit", &self.region_limit)
            .finish()
    }
}
