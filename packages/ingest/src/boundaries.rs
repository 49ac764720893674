//! Resolving bylaw "between" fields into intersection boundary pairs.
//!
//! A full scan of both bylaw tables. A bylaw contributes a boundary
//! pair only when its own street and both cross streets resolve to
//! known highways — there is no partial assignment, because a bylaw
//! with a single resolved endpoint is not useful. Bylaw rows are
//! written in one batch at the end of the scan; bylaws that fail
//! resolution are left untouched, so previously assigned boundaries
//! are never cleared.

use duckdb::Connection;
use parking_map_database::queries::{self, BoundaryUpdate, BylawRef};
use parking_map_database::DbError;

use crate::between::parse_between;
use crate::import::parse_highway_name;

/// Counts from one boundary-resolution scan.
#[derive(Debug, Default, Clone, Copy)]
pub struct BoundarySummary {
    /// Bylaw rows scanned.
    pub scanned: u64,
    /// Bylaws whose boundary pair resolved.
    pub resolved: u64,
    /// Bylaws left untouched (unsplittable text or unknown street).
    pub unresolved: u64,
    /// Bylaw rows updated by the batch commit.
    pub updated_rows: u64,
}

/// Scans every bylaw and assigns boundary intersections where the
/// "between" text resolves.
///
/// Intersections are get-or-created as they are encountered (repeat
/// pairs reuse the existing row); the bylaw boundary references are
/// committed in a single batch after the scan.
///
/// # Errors
///
/// Returns [`DbError`] if any database operation fails.
pub fn resolve_boundaries(conn: &Connection) -> Result<BoundarySummary, DbError> {
    let bylaws = queries::select_bylaws_for_resolution(conn)?;

    let mut summary = BoundarySummary::default();
    let mut updates: Vec<BoundaryUpdate> = Vec::new();

    for bylaw in &bylaws {
        summary.scanned += 1;
        match resolve_bylaw(conn, bylaw)? {
            Some(update) => {
                summary.resolved += 1;
                updates.push(update);
            }
            None => summary.unresolved += 1,
        }
    }

    summary.updated_rows = queries::batch_update_bylaw_boundaries(conn, &updates)?;
    log::info!(
        "Boundary scan: {}/{} bylaw(s) resolved",
        summary.resolved,
        summary.scanned
    );

    Ok(summary)
}

fn resolve_bylaw(
    conn: &Connection,
    bylaw: &BylawRef,
) -> Result<Option<BoundaryUpdate>, DbError> {
    let Some(between) = bylaw.between.as_deref() else {
        return Ok(None);
    };
    let Some((street_a, street_b)) = parse_between(between) else {
        log::debug!("Bylaw {}: unsplittable between text {between:?}", bylaw.id);
        return Ok(None);
    };

    let (main_name, _) = parse_highway_name(&bylaw.highway);
    let Some(main) = queries::find_highway(conn, &main_name)? else {
        log::debug!("Bylaw {}: unknown highway {main_name:?}", bylaw.id);
        return Ok(None);
    };
    let Some(cross_a) = queries::find_highway(conn, &street_a)? else {
        log::debug!("Bylaw {}: unknown cross street {street_a:?}", bylaw.id);
        return Ok(None);
    };
    let Some(cross_b) = queries::find_highway(conn, &street_b)? else {
        log::debug!("Bylaw {}: unknown cross street {street_b:?}", bylaw.id);
        return Ok(None);
    };

    let start = queries::get_or_create_intersection(conn, &main, &cross_a)?;
    let end = queries::get_or_create_intersection(conn, &main, &cross_b)?;

    Ok(Some(BoundaryUpdate {
        kind: bylaw.kind,
        bylaw_id: bylaw.id,
        boundary_start_id: start.id,
        boundary_end_id: end.id,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::import_records;
    use parking_map_bylaw_models::{BylawKind, BylawRecord, GeocodeStatus};
    use parking_map_database::db::open_in_memory;

    fn record(source_id: &str, highway: &str, between: &str) -> BylawRecord {
        BylawRecord {
            source_id: source_id.to_string(),
            highway: highway.to_string(),
            between: Some(between.to_string()),
            ..BylawRecord::default()
        }
    }

    fn seed_highways(conn: &Connection, names: &[&str]) {
        for name in names {
            queries::get_or_create_highway(conn, name, None).unwrap();
        }
    }

    #[test]
    fn resolves_simple_between_field() {
        let conn = open_in_memory().unwrap();
        seed_highways(&conn, &["Glenholme Avenue", "Oakwood Avenue"]);
        import_records(
            &conn,
            BylawKind::NoParking,
            &[record(
                "1",
                "Ashbury Avenue",
                "Glenholme Avenue and Oakwood Avenue",
            )],
        )
        .unwrap();

        let summary = resolve_boundaries(&conn).unwrap();
        assert_eq!(summary.scanned, 1);
        assert_eq!(summary.resolved, 1);
        assert_eq!(summary.updated_rows, 1);

        let (start, end) =
            queries::boundary_refs_for_source(&conn, BylawKind::NoParking, "1").unwrap();
        let start = queries::get_intersection(&conn, start.unwrap())
            .unwrap()
            .unwrap();
        let end = queries::get_intersection(&conn, end.unwrap())
            .unwrap()
            .unwrap();

        assert_eq!(start.main_street.name, "Ashbury Avenue");
        assert_eq!(start.cross_street.name, "Glenholme Avenue");
        assert_eq!(start.status, GeocodeStatus::NotFetched);
        assert_eq!(start.lat, None);
        assert_eq!(end.cross_street.name, "Oakwood Avenue");
    }

    #[test]
    fn unsplittable_between_leaves_bylaw_untouched() {
        let conn = open_in_memory().unwrap();
        seed_highways(&conn, &["Glenholme Avenue", "Oakwood Avenue"]);
        import_records(
            &conn,
            BylawKind::NoParking,
            &[record(
                "1",
                "Ashbury Avenue",
                "Glenholme Avenue and Oakwood Avenue and Winona Drive",
            )],
        )
        .unwrap();

        let summary = resolve_boundaries(&conn).unwrap();
        assert_eq!(summary.resolved, 0);
        assert_eq!(summary.unresolved, 1);
        assert_eq!(
            queries::boundary_refs_for_source(&conn, BylawKind::NoParking, "1").unwrap(),
            (None, None)
        );
    }

    #[test]
    fn unknown_cross_street_means_no_partial_write() {
        let conn = open_in_memory().unwrap();
        seed_highways(&conn, &["Glenholme Avenue"]);
        import_records(
            &conn,
            BylawKind::NoParking,
            &[record(
                "1",
                "Ashbury Avenue",
                "Glenholme Avenue and Nowhere Street",
            )],
        )
        .unwrap();

        resolve_boundaries(&conn).unwrap();
        assert_eq!(
            queries::boundary_refs_for_source(&conn, BylawKind::NoParking, "1").unwrap(),
            (None, None)
        );
    }

    #[test]
    fn qualifier_clause_resolves_to_the_stripped_name() {
        let conn = open_in_memory().unwrap();
        seed_highways(&conn, &["Brock Avenue", "Abbs Street"]);
        import_records(
            &conn,
            BylawKind::NoParking,
            &[record(
                "1",
                "Brock Avenue",
                "Brock Avenue and the west end of Abbs Street",
            )],
        )
        .unwrap();

        let summary = resolve_boundaries(&conn).unwrap();
        assert_eq!(summary.resolved, 1);

        let (_, end) =
            queries::boundary_refs_for_source(&conn, BylawKind::NoParking, "1").unwrap();
        let end = queries::get_intersection(&conn, end.unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(end.cross_street.name, "Abbs Street");
    }

    #[test]
    fn rescan_reuses_intersections() {
        let conn = open_in_memory().unwrap();
        seed_highways(&conn, &["Glenholme Avenue", "Oakwood Avenue"]);
        import_records(
            &conn,
            BylawKind::NoParking,
            &[record(
                "1",
                "Ashbury Avenue",
                "Glenholme Avenue and Oakwood Avenue",
            )],
        )
        .unwrap();

        resolve_boundaries(&conn).unwrap();
        let (first_start, first_end) =
            queries::boundary_refs_for_source(&conn, BylawKind::NoParking, "1").unwrap();

        resolve_boundaries(&conn).unwrap();
        let (second_start, second_end) =
            queries::boundary_refs_for_source(&conn, BylawKind::NoParking, "1").unwrap();

        assert_eq!(first_start, second_start);
        assert_eq!(first_end, second_end);
    }

    #[test]
    fn failed_resolution_does_not_clear_existing_boundaries() {
        let conn = open_in_memory().unwrap();
        seed_highways(&conn, &["Glenholme Avenue"]);
        import_records(
            &conn,
            BylawKind::NoParking,
            &[record(
                "1",
                "Ashbury Avenue",
                "Glenholme Avenue and Nowhere Street",
            )],
        )
        .unwrap();

        // Boundaries assigned out of band (e.g. an earlier run before the
        // cross street was renamed away).
        let main = queries::find_highway(&conn, "Ashbury Avenue").unwrap().unwrap();
        let cross = queries::find_highway(&conn, "Glenholme Avenue")
            .unwrap()
            .unwrap();
        let intersection = queries::get_or_create_intersection(&conn, &main, &cross).unwrap();
        queries::batch_update_bylaw_boundaries(
            &conn,
            &[BoundaryUpdate {
                kind: BylawKind::NoParking,
                bylaw_id: 1,
                boundary_start_id: intersection.id,
                boundary_end_id: intersection.id,
            }],
        )
        .unwrap();

        resolve_boundaries(&conn).unwrap();

        assert_eq!(
            queries::boundary_refs_for_source(&conn, BylawKind::NoParking, "1").unwrap(),
            (Some(intersection.id), Some(intersection.id))
        );
    }
}
