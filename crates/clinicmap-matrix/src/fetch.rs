//! One distance-matrix request per (region, batch) pair.
//!
//! Failures never escape this module: a failed request becomes
//! [`BatchOutcome::Failed`] and a bad element becomes a
//! [`SkippedDestination`], so a single bad batch or destination cannot abort
//! the run.

use clinicmap_core::{
    BatchOutcome, DistanceRecord, Location, SkipReason, SkippedDestination, UnitSystem,
};

use crate::client::DistanceMatrixClient;
use crate::types::{DistanceMatrixResponse, MatrixElement};

const ZERO_RESULTS: &str = "ZERO_RESULTS";

/// Everything needed to issue the request for one batch.
#[derive(Debug, Clone, Copy)]
pub struct BatchRequest<'a> {
    pub region: &'a str,
    pub origin: &'a str,
    pub batch_index: usize,
    pub locations: &'a [Location],
    pub units: UnitSystem,
}

/// Sends a single request for `request.locations` and interprets the result.
/// No retries: a failed attempt is final for this run.
pub async fn fetch_batch(client: &DistanceMatrixClient, request: BatchRequest<'_>) -> BatchOutcome {
    tracing::info!(
        region = request.region,
        batch = request.batch_index,
        destinations = request.locations.len(),
        "sending distance matrix batch"
    );

    let destinations: Vec<&str> = request
        .locations
        .iter()
        .map(|l| l.address.as_str())
        .collect();

    match client
        .get_matrix(request.origin, &destinations, request.units)
        .await
    {
        Ok(response) => interpret_response(request.region, &response, request.locations),
        Err(e) => {
            tracing::warn!(
                region = request.region,
                batch = request.batch_index,
                origin = request.origin,
                error = %e,
                "distance matrix request failed; batch contributes no results"
            );
            BatchOutcome::Failed {
                reason: e.to_string(),
            }
        }
    }
}

/// Turns a successful response into records, pairing element `i` with
/// `locations[i]`.
#[must_use]
pub fn interpret_response(
    region: &str,
    response: &DistanceMatrixResponse,
    locations: &[Location],
) -> BatchOutcome {
    let mut records = Vec::with_capacity(locations.len());
    let mut skipped = Vec::new();

    for (index, location) in locations.iter().enumerate() {
        match parse_element(response, index, location) {
            Ok(record) => records.push(record),
            Err(reason) => {
                match &reason {
                    SkipReason::NoRoute => tracing::debug!(
                        region,
                        location_id = location.id,
                        origin = response.origin_address().unwrap_or("<unknown>"),
                        "zero results from origin"
                    ),
                    SkipReason::EmptyResult => tracing::info!(
                        region,
                        location_id = location.id,
                        "no matrix element for destination"
                    ),
                    SkipReason::Malformed(detail) => tracing::warn!(
                        region,
                        location_id = location.id,
                        detail = %detail,
                        "error reading matrix element"
                    ),
                }
                skipped.push(SkippedDestination {
                    location_id: location.id,
                    reason,
                });
            }
        }
    }

    BatchOutcome::Fetched { records, skipped }
}

fn parse_element(
    response: &DistanceMatrixResponse,
    index: usize,
    location: &Location,
) -> Result<DistanceRecord, SkipReason> {
    let raw = response.element(index).ok_or(SkipReason::EmptyResult)?;
    let element =
        MatrixElement::from_value(raw).map_err(|e| SkipReason::Malformed(e.to_string()))?;

    if element.status == ZERO_RESULTS {
        return Err(SkipReason::NoRoute);
    }

    let distance = element.distance.ok_or_else(|| {
        SkipReason::Malformed(format!("element status {} has no distance", element.status))
    })?;
    let duration = element.duration.ok_or_else(|| {
        SkipReason::Malformed(format!("element status {} has no duration", element.status))
    })?;
    let resolved_address = response
        .destination_address(index)
        .map(str::to_owned)
        .ok_or_else(|| SkipReason::Malformed(format!("no destination address at index {index}")))?;

    Ok(DistanceRecord {
        location_id: location.id,
        distance_text: distance.text,
        distance_value: distance.value,
        duration_text: duration.text,
        input_address: location.address.clone(),
        resolved_address,
    })
}
