//! Loading the run's inputs. Every failure here is fatal: the run must not
//! start calling the provider with an incomplete picture.

use std::path::Path;

use anyhow::Context;
use clinicmap_core::{
    assign_ids, regions_from_boundaries, BoundaryCollection, Location, OriginOverrides, Region,
};
use serde_json::Value;

/// Fetches (or reads) the clinic list and assigns ids in source order.
pub(crate) async fn load_locations(
    client: &reqwest::Client,
    url: &str,
    local_path: Option<&Path>,
    address_field: &str,
) -> anyhow::Result<Vec<Location>> {
    let raw: Vec<Value> = if let Some(path) = local_path {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed reading location source {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("location source {} is not a JSON array", path.display()))?
    } else {
        client
            .get(url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .with_context(|| format!("failed fetching location source {url}"))?
            .json::<Vec<Value>>()
            .await
            .with_context(|| format!("location source {url} is not a JSON array"))?
    };

    let locations = assign_ids(raw, address_field)?;
    tracing::info!(count = locations.len(), "loaded locations");
    Ok(locations)
}

/// Reads the boundary GeoJSON and keeps in-state regions.
pub(crate) fn load_regions(path: &Path, state_prefix: &str) -> anyhow::Result<Vec<Region>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed reading boundary source {}", path.display()))?;
    let collection = BoundaryCollection::from_json_str(&content)
        .with_context(|| format!("invalid boundary source {}", path.display()))?;

    let regions = regions_from_boundaries(&collection, state_prefix);
    tracing::info!(
        features = collection.features.len(),
        regions = regions.len(),
        state_prefix,
        "loaded regions"
    );
    Ok(regions)
}

/// Built-in overrides, extended by the optional YAML file.
pub(crate) fn load_overrides(path: Option<&Path>) -> anyhow::Result<OriginOverrides> {
    let builtin = OriginOverrides::montana();
    let Some(path) = path else {
        return Ok(builtin);
    };
    let from_file = OriginOverrides::load(path)?;
    tracing::info!(
        path = %path.display(),
        entries = from_file.len(),
        "loaded origin overrides"
    );
    Ok(builtin.merge(from_file))
}
