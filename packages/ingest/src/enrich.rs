//! The geocode enrichment run.
//!
//! Selects bylaws whose boundary intersections still need coordinates
//! and resolves them one lookup at a time — bylaws are processed as
//! pairs so both endpoints of a segment land together rather than one
//! boundary at a time. Lookups are strictly sequential because the
//! geocoding service is rate-limited.
//!
//! All mutable run state lives in a run-scoped struct: a staging map
//! keyed by intersection id (so one run never geocodes the same
//! intersection twice) and the timed-out counter feeding the circuit
//! breaker. Staged results are persisted in one batch after the loop
//! ends, whether it ran to completion or the breaker tripped.

use std::collections::BTreeMap;

use duckdb::Connection;
use parking_map_bylaw_models::{GeocodeStatus, Intersection};
use parking_map_database::queries;
use parking_map_geocoder::{Geocode, GeocodeError, IntersectionGeocoder};

/// Per-run bylaw selection cap.
pub const MAX_BYLAWS_PER_RUN: u64 = 90;

/// Timed-out lookups tolerated before the run stops early. A guard
/// against burning the external service's rate limit when it is
/// throttling everything.
pub const TIMEOUT_BUDGET: u32 = 5;

/// Tunables for one enrichment run.
#[derive(Debug, Clone, Copy)]
pub struct EnrichOptions {
    /// Maximum bylaws selected this run.
    pub limit: u64,
    /// Circuit breaker threshold.
    pub timeout_budget: u32,
}

impl Default for EnrichOptions {
    fn default() -> Self {
        Self {
            limit: MAX_BYLAWS_PER_RUN,
            timeout_budget: TIMEOUT_BUDGET,
        }
    }
}

/// Counts from one enrichment run.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnrichSummary {
    /// Bylaws selected.
    pub selected: u64,
    /// Geocode lookups issued (including short-circuited skips).
    pub fetched: u64,
    /// Lookups that produced accepted coordinates.
    pub found: u64,
    /// Conclusive misses.
    pub not_found: u64,
    /// Lookups short-circuited on an empty street name.
    pub skipped: u64,
    /// Transport give-ups.
    pub timed_out: u64,
    /// Intersection rows persisted by the batch commit.
    pub updated_rows: u64,
    /// Whether the circuit breaker stopped the run early.
    pub breaker_tripped: bool,
}

/// Mutable state scoped to a single run.
#[derive(Default)]
struct RunState {
    /// Intersections already resolved this run, keyed by id.
    staged: BTreeMap<i64, Intersection>,
    /// Transport give-ups so far.
    timeout_count: u32,
}

/// Runs one enrichment pass: select, geocode, batch-persist.
///
/// Intersections already conclusively geocoded (`FOUND`/`SKIPPED`) are
/// never re-fetched; `NOT_FOUND` ones are. The run stops early once the
/// timed-out count reaches the budget, and whatever was staged up to
/// that point is still committed.
///
/// # Errors
///
/// Returns an error if a database operation fails or the geocoder
/// answers with something that is not its documented XML — transport
/// failures do not error the run, they count toward the breaker.
pub async fn enrich(
    conn: &Connection,
    geocoder: &dyn IntersectionGeocoder,
    options: EnrichOptions,
) -> Result<EnrichSummary, Box<dyn std::error::Error>> {
    let bylaws = queries::select_bylaws_needing_update(conn, options.limit)?;
    log::info!("{} bylaw(s) need boundary geocoding", bylaws.len());

    let mut run = RunState::default();
    let mut summary = EnrichSummary {
        selected: bylaws.len() as u64,
        ..EnrichSummary::default()
    };

    'bylaws: for bylaw in &bylaws {
        for intersection in [&bylaw.start, &bylaw.end] {
            if intersection.status.is_conclusive()
                || run.staged.contains_key(&intersection.id)
            {
                continue;
            }

            let geocode = fetch_one(geocoder, intersection, &mut run, &mut summary).await?;

            let mut updated = intersection.clone();
            updated.lat = geocode.lat;
            updated.lng = geocode.lng;
            updated.status = geocode.status;
            run.staged.insert(updated.id, updated);
        }

        if run.timeout_count >= options.timeout_budget {
            log::warn!(
                "Stopping run early: {} geocode lookup(s) timed out",
                run.timeout_count
            );
            summary.breaker_tripped = true;
            break 'bylaws;
        }
    }

    let staged: Vec<Intersection> = run.staged.into_values().collect();
    summary.updated_rows = queries::batch_update_intersections(conn, &staged)?;

    log::info!(
        "Enrichment run complete: {} found, {} not found, {} skipped, {} timed out ({} row(s) written)",
        summary.found,
        summary.not_found,
        summary.skipped,
        summary.timed_out,
        summary.updated_rows
    );

    Ok(summary)
}

/// Issues one lookup and classifies the outcome.
///
/// Transport failures become [`GeocodeStatus::TimedOut`] and bump the
/// run's breaker counter. A response that violates the service contract
/// propagates as an error.
async fn fetch_one(
    geocoder: &dyn IntersectionGeocoder,
    intersection: &Intersection,
    run: &mut RunState,
    summary: &mut EnrichSummary,
) -> Result<Geocode, GeocodeError> {
    summary.fetched += 1;

    match geocoder
        .fetch(
            &intersection.main_street.name,
            &intersection.cross_street.name,
        )
        .await
    {
        Ok(geocode) => {
            match geocode.status {
                GeocodeStatus::Found => summary.found += 1,
                GeocodeStatus::NotFound => summary.not_found += 1,
                GeocodeStatus::Skipped => summary.skipped += 1,
                GeocodeStatus::NotFetched | GeocodeStatus::TimedOut => {}
            }
            Ok(geocode)
        }
        Err(e) if e.is_transport_failure() => {
            run.timeout_count += 1;
            summary.timed_out += 1;
            log::warn!("Geocode for {intersection} failed: {e}");
            Ok(Geocode::timed_out())
        }
        Err(e) => Err(e),
    }
}
