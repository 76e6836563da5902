use crate::app_config::{AppConfig, UnitSystem};
use crate::batch::MAX_DESTINATIONS_PER_REQUEST;
use crate::ConfigError;

/// Pinned copy of the Montana WIC clinic list the lookup is built from.
pub const DEFAULT_LOCATIONS_URL: &str = "https://raw.githubusercontent.com/navapbc/\
wic-mt-demo-project-eligibility-screener/4cb9a3fee1366175a8ea8323924b61f4d308e9d8/\
app/public/data/clinics.json";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>().map_err(|e| invalid(var, e.to_string()))
    };

    let google_maps_api_key = require("GOOGLE_MAPS_API_KEY")?;

    let log_level = or_default("CLINICMAP_LOG_LEVEL", "info");
    let locations_url = or_default("CLINICMAP_LOCATIONS_URL", DEFAULT_LOCATIONS_URL);
    let address_field = or_default("CLINICMAP_ADDRESS_FIELD", "clinicAddress");
    let boundary_path = PathBuf::from(or_default(
        "CLINICMAP_BOUNDARY_PATH",
        "./data/mt_zcta_20_bound-geo.json",
    ));
    let overrides_path = lookup("CLINICMAP_OVERRIDES_PATH")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from);
    let state_prefix = or_default("CLINICMAP_STATE_PREFIX", "59");
    let output_dir = PathBuf::from(or_default("CLINICMAP_OUTPUT_DIR", "./output"));
    let units = parse_units(&or_default("CLINICMAP_UNITS", "imperial"))?;

    let batch_size = parse_usize("CLINICMAP_BATCH_SIZE", "25")?;
    if batch_size == 0 || batch_size > MAX_DESTINATIONS_PER_REQUEST {
        return Err(invalid(
            "CLINICMAP_BATCH_SIZE",
            format!("must be between 1 and {MAX_DESTINATIONS_PER_REQUEST}, got {batch_size}"),
        ));
    }

    let request_timeout_secs = parse_u64("CLINICMAP_REQUEST_TIMEOUT_SECS", "30")?;
    if request_timeout_secs == 0 {
        return Err(invalid(
            "CLINICMAP_REQUEST_TIMEOUT_SECS",
            "must be at least 1 second".to_string(),
        ));
    }
    let user_agent = or_default("CLINICMAP_USER_AGENT", "clinicmap/0.1 (zip-code-lookup)");

    let region_offset = parse_usize("CLINICMAP_REGION_OFFSET", "0")?;
    let region_limit = match lookup("CLINICMAP_REGION_LIMIT") {
        Ok(raw) if !raw.trim().is_empty() => Some(
            raw.parse::<usize>()
                .map_err(|e| invalid("CLINICMAP_REGION_LIMIT", e.to_string()))?,
        ),
        _ => None,
    };

    Ok(AppConfig {
        google_maps_api_key,
        log_level,
        locations_url,
        address_field,
        boundary_path,
        overrides_path,
        state_prefix,
        output_dir,
        units,
        batch_size,
        request_timeout_secs,
        user_agent,
        region_offset,
        region_limit,
    })
}

/// Parse a unit system name as accepted by the distance-matrix API.
fn parse_units(s: &str) -> Result<UnitSystem, ConfigError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "imperial" => Ok(UnitSystem::Imperial),
        "metric" => Ok(UnitSystem::Metric),
        other => Err(ConfigError::InvalidEnvVar {
            var: "CLINICMAP_UNITS".to_string(),
            reason: format!("expected 'imperial' or 'metric', got '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
