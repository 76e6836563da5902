//! Run orchestration: load inputs once, walk regions one at a time, write
//! outputs at the end.
//!
//! Requests are strictly sequential. Each batch is awaited before the next is
//! sent so the provider's rate limit is never approached; do not fan out here
//! without revisiting that constraint.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clinicmap_core::{
    partition, rank_region, resolve_origin, AppConfig, BatchOutcome, Location, LookupBuilder,
    LookupTables, OriginOverrides, Region, UnitSystem,
};
use clinicmap_matrix::{fetch_batch, BatchRequest, DistanceMatrixClient};

use crate::{output, sources};

/// Per-invocation settings resolved from CLI flags and config.
#[derive(Debug, Clone)]
pub(crate) struct RunOptions {
    pub offset: usize,
    pub limit: Option<usize>,
    pub locations_path: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub dry_run: bool,
}

/// Counters reported when the run finishes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RunTotals {
    pub regions: usize,
    pub requests: usize,
    pub failed_batches: usize,
    pub records: usize,
    pub skipped: usize,
}

/// Runs the whole build.
///
/// # Errors
///
/// Returns an error if any input cannot be loaded, the HTTP clients cannot
/// be built, or any output file cannot be written. Provider failures are
/// logged and do not produce errors.
pub(crate) async fn run(config: &AppConfig, options: &RunOptions) -> anyhow::Result<()> {
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .user_agent(config.user_agent.as_str())
        .build()
        .context("failed creating HTTP client")?;

    let locations = sources::load_locations(
        &http,
        &config.locations_url,
        options.locations_path.as_deref(),
        &config.address_field,
    )
    .await?;
    let regions = sources::load_regions(&config.boundary_path, &config.state_prefix)?;
    let overrides = sources::load_overrides(config.overrides_path.as_deref())?;

    let selected = select_regions(&regions, options.offset, options.limit);
    let batch_count = partition(&locations, config.batch_size).len();
    tracing::info!(
        regions = selected.len(),
        of = regions.len(),
        offset = options.offset,
        batches_per_region = batch_count,
        requests = selected.len() * batch_count,
        "planned run"
    );

    if options.dry_run {
        for region in selected {
            tracing::info!(
                region = %region.code,
                origin = %resolve_origin(region, &overrides),
                "dry-run: would process region"
            );
        }
        return Ok(());
    }

    let client = DistanceMatrixClient::new(
        &config.google_maps_api_key,
        config.request_timeout_secs,
        &config.user_agent,
    )
    .context("failed creating distance matrix client")?;

    let (tables, totals) = build_lookup(
        &client,
        selected,
        &locations,
        &overrides,
        config.batch_size,
        config.units,
    )
    .await;

    tracing::info!(
        regions = totals.regions,
        requests = totals.requests,
        failed_batches = totals.failed_batches,
        records = totals.records,
        skipped = totals.skipped,
        "finished distance requests"
    );
    if totals.failed_batches > 0 {
        tracing::warn!(
            failed_batches = totals.failed_batches,
            "some batches failed; affected regions are missing those clinics"
        );
    }

    output::write_outputs(&options.output_dir, &locations, &tables)?;
    Ok(())
}

/// The `offset`/`limit` window over the filtered region list.
pub(crate) fn select_regions(regions: &[Region], offset: usize, limit: Option<usize>) -> &[Region] {
    let start = offset.min(regions.len());
    let end = limit.map_or(regions.len(), |l| start.saturating_add(l).min(regions.len()));
    &regions[start..end]
}

/// Fetches every batch for every region in order and ranks the results.
pub(crate) async fn build_lookup(
    client: &DistanceMatrixClient,
    regions: &[Region],
    locations: &[Location],
    overrides: &OriginOverrides,
    batch_size: usize,
    units: UnitSystem,
) -> (LookupTables, RunTotals) {
    let batches = partition(locations, batch_size);
    let mut builder = LookupBuilder::new();
    let mut totals = RunTotals::default();

    for (position, region) in regions.iter().enumerate() {
        let origin = resolve_origin(region, overrides);
        tracing::info!(
            region = %region.code,
            origin = %origin,
            position = position + 1,
            total = regions.len(),
            "starting region"
        );

        let mut outcomes = Vec::with_capacity(batches.len());
        for (batch_index, batch) in batches.iter().enumerate() {
            let outcome = fetch_batch(
                client,
                BatchRequest {
                    region: &region.code,
                    origin: &origin,
                    batch_index,
                    locations: batch,
                    units,
                },
            )
            .await;
            totals.requests += 1;
            match &outcome {
                BatchOutcome::Failed { .. } => totals.failed_batches += 1,
                BatchOutcome::Fetched { skipped, .. } => {
                    totals.skipped += skipped.len();
                }
            }
            outcomes.push(outcome);
        }

        let ranked = rank_region(outcomes);
        let summary = builder.add_region(&region.code, &ranked);
        totals.records += summary.entries;
        if summary.audit_captured {
            tracing::info!(region = %region.code, entries = summary.entries, "captured address audit");
        }
        tracing::debug!(region = %region.code, entries = summary.entries, "ranked region");
    }

    totals.regions = builder.region_count();
    (builder.finish(), totals)
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
