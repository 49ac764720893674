//! Repository queries for highways, intersections, and bylaws.
//!
//! All access to the tables goes through these functions. The
//! get-or-create functions are race-safe (`INSERT … ON CONFLICT DO
//! NOTHING` followed by a select) and the batch updates are
//! all-or-nothing (explicit transaction bracket).

use std::str::FromStr as _;

use duckdb::{Connection, params};
use parking_map_bylaw_models::{
    BylawKind, BylawRecord, GeocodeStatus, Highway, Intersection, StreetEnd,
};

use crate::DbError;

/// A bylaw row reference used by the boundary-resolution scan.
#[derive(Debug, Clone)]
pub struct BylawRef {
    /// Which bylaw table the row lives in.
    pub kind: BylawKind,
    /// Database row id.
    pub id: i64,
    /// Raw street text from the dump.
    pub highway: String,
    /// Free-text "between" boundary description.
    pub between: Option<String>,
}

/// A staged bylaw boundary assignment.
#[derive(Debug, Clone, Copy)]
pub struct BoundaryUpdate {
    /// Which bylaw table the row lives in.
    pub kind: BylawKind,
    /// Database row id of the bylaw.
    pub bylaw_id: i64,
    /// Intersection id for the segment start.
    pub boundary_start_id: i64,
    /// Intersection id for the segment end.
    pub boundary_end_id: i64,
}

/// A bylaw selected for geocode enrichment, with both of its boundary
/// intersections loaded.
#[derive(Debug, Clone)]
pub struct BylawBoundaries {
    /// Which bylaw table the row lives in.
    pub kind: BylawKind,
    /// Database row id of the bylaw.
    pub id: i64,
    /// Boundary-start intersection.
    pub start: Intersection,
    /// Boundary-end intersection.
    pub end: Intersection,
}

/// Looks up a highway by exact name, case-insensitively.
///
/// No fuzzy matching: an unmatched name means the caller's intersection
/// resolution aborts for that bylaw.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails.
pub fn find_highway(conn: &Connection, name: &str) -> Result<Option<Highway>, DbError> {
    let mut stmt =
        conn.prepare("SELECT id, name, street_end FROM highways WHERE LOWER(name) = LOWER(?)")?;
    let mut rows = stmt.query(params![name])?;

    let Some(row) = rows.next()? else {
        return Ok(None);
    };

    Ok(Some(Highway {
        id: row.get(0)?,
        name: row.get(1)?,
        street_end: parse_street_end(row.get(2)?)?,
    }))
}

/// Gets or creates a highway row keyed by exact name.
///
/// An existing row is returned untouched — the first import of a name
/// wins, including its `street_end`.
///
/// # Errors
///
/// Returns [`DbError`] if the insert or select fails.
pub fn get_or_create_highway(
    conn: &Connection,
    name: &str,
    street_end: Option<StreetEnd>,
) -> Result<Highway, DbError> {
    let mut stmt = conn.prepare(
        "INSERT INTO highways (id, name, street_end)
         VALUES (nextval('highways_id_seq'), ?, ?)
         ON CONFLICT (name) DO NOTHING",
    )?;
    stmt.execute(params![name, street_end.map(|e| e.to_string())])?;

    let mut stmt = conn.prepare("SELECT id, name, street_end FROM highways WHERE name = ?")?;
    let mut rows = stmt.query(params![name])?;

    let Some(row) = rows.next()? else {
        return Err(DbError::Conversion {
            message: format!("Highway '{name}' missing after upsert"),
        });
    };

    Ok(Highway {
        id: row.get(0)?,
        name: row.get(1)?,
        street_end: parse_street_end(row.get(2)?)?,
    })
}

/// Gets or creates the intersection row for the ordered (main, cross)
/// highway pair.
///
/// An existing row is returned with its coordinates and status intact —
/// a get never overwrites previously resolved data. New rows start as
/// `NOT_FETCHED` with null coordinates.
///
/// # Errors
///
/// Returns [`DbError`] if the insert or select fails.
pub fn get_or_create_intersection(
    conn: &Connection,
    main: &Highway,
    cross: &Highway,
) -> Result<Intersection, DbError> {
    let mut stmt = conn.prepare(
        "INSERT INTO intersections (id, main_street_id, cross_street_id, status)
         VALUES (nextval('intersections_id_seq'), ?, ?, ?)
         ON CONFLICT (main_street_id, cross_street_id) DO NOTHING",
    )?;
    stmt.execute(params![
        main.id,
        cross.id,
        GeocodeStatus::NotFetched.to_string()
    ])?;

    let mut stmt = conn.prepare(
        "SELECT id, lat, lng, status FROM intersections
         WHERE main_street_id = ? AND cross_street_id = ?",
    )?;
    let mut rows = stmt.query(params![main.id, cross.id])?;

    let Some(row) = rows.next()? else {
        return Err(DbError::Conversion {
            message: format!(
                "Intersection ({}, {}) missing after upsert",
                main.name, cross.name
            ),
        });
    };

    let status: String = row.get(3)?;
    Ok(Intersection {
        id: row.get(0)?,
        main_street: main.clone(),
        cross_street: cross.clone(),
        lat: row.get(1)?,
        lng: row.get(2)?,
        status: parse_status(&status)?,
    })
}

/// Loads an intersection row (with both highways) by id.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails.
pub fn get_intersection(conn: &Connection, id: i64) -> Result<Option<Intersection>, DbError> {
    let mut stmt = conn.prepare(
        "SELECT i.id, i.lat, i.lng, i.status,
                m.id, m.name, m.street_end,
                c.id, c.name, c.street_end
         FROM intersections i
         JOIN highways m ON m.id = i.main_street_id
         JOIN highways c ON c.id = i.cross_street_id
         WHERE i.id = ?",
    )?;
    let mut rows = stmt.query(params![id])?;

    let Some(row) = rows.next()? else {
        return Ok(None);
    };

    Ok(Some(read_intersection(row, 0)?))
}

/// Inserts a bylaw row, deduplicating on `source_id`.
///
/// Returns `true` if a row was inserted, `false` if the `source_id`
/// already existed (re-import leaves the table unchanged).
///
/// # Errors
///
/// Returns [`DbError`] if the insert fails.
pub fn insert_bylaw(
    conn: &Connection,
    kind: BylawKind,
    record: &BylawRecord,
    between_street_a: Option<&str>,
    between_street_b: Option<&str>,
) -> Result<bool, DbError> {
    let inserted = match kind {
        BylawKind::NoParking => {
            let mut stmt = conn.prepare(
                "INSERT INTO no_parking_bylaws (
                    id, source_id, bylaw_no, schedule, schedule_name, highway,
                    side, between_streets, between_street_a, between_street_b,
                    prohibited_times_and_or_days
                ) VALUES (
                    nextval('no_parking_bylaws_id_seq'),
                    ?, ?, ?, ?, ?, ?, ?, ?, ?, ?
                )
                ON CONFLICT (source_id) DO NOTHING",
            )?;
            stmt.execute(params![
                record.source_id,
                record.bylaw_no,
                record.schedule,
                record.schedule_name,
                record.highway,
                record.side,
                record.between,
                between_street_a,
                between_street_b,
                record.prohibited_times_and_or_days,
            ])?
        }
        BylawKind::RestrictedParking => {
            let mut stmt = conn.prepare(
                "INSERT INTO restricted_parking_bylaws (
                    id, source_id, bylaw_no, schedule, schedule_name, highway,
                    side, between_streets, between_street_a, between_street_b,
                    times_and_or_days, max_period_permitted
                ) VALUES (
                    nextval('restricted_parking_bylaws_id_seq'),
                    ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?
                )
                ON CONFLICT (source_id) DO NOTHING",
            )?;
            stmt.execute(params![
                record.source_id,
                record.bylaw_no,
                record.schedule,
                record.schedule_name,
                record.highway,
                record.side,
                record.between,
                between_street_a,
                between_street_b,
                record.times_and_or_days,
                record.max_period_permitted,
            ])?
        }
    };

    Ok(inserted > 0)
}

/// Returns the row count of a bylaw table.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails.
pub fn bylaw_count(conn: &Connection, kind: BylawKind) -> Result<i64, DbError> {
    let count = conn
        .prepare(&format!("SELECT COUNT(*) FROM {}", kind.table()))?
        .query_row([], |row| row.get::<_, i64>(0))?;
    Ok(count)
}

/// Returns how many rows of a bylaw table carry the given `source_id`.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails.
pub fn bylaw_count_for_source_id(
    conn: &Connection,
    kind: BylawKind,
    source_id: &str,
) -> Result<i64, DbError> {
    let count = conn
        .prepare(&format!(
            "SELECT COUNT(*) FROM {} WHERE source_id = ?",
            kind.table()
        ))?
        .query_row(params![source_id], |row| row.get::<_, i64>(0))?;
    Ok(count)
}

/// Returns the boundary intersection ids of a bylaw row, looked up by
/// `source_id`.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails.
pub fn boundary_refs_for_source(
    conn: &Connection,
    kind: BylawKind,
    source_id: &str,
) -> Result<(Option<i64>, Option<i64>), DbError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT boundary_start_id, boundary_end_id FROM {} WHERE source_id = ?",
        kind.table()
    ))?;
    let mut rows = stmt.query(params![source_id])?;

    let Some(row) = rows.next()? else {
        return Ok((None, None));
    };

    Ok((row.get(0)?, row.get(1)?))
}

/// Returns every bylaw row (both variants) in insertion order, for the
/// boundary-resolution scan.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails.
pub fn select_bylaws_for_resolution(conn: &Connection) -> Result<Vec<BylawRef>, DbError> {
    let mut stmt = conn.prepare(
        "SELECT kind, id, highway, between_streets FROM (
            SELECT 'NO_PARKING' AS kind, 0 AS ord, id, highway, between_streets
            FROM no_parking_bylaws
            UNION ALL
            SELECT 'RESTRICTED_PARKING' AS kind, 1 AS ord, id, highway, between_streets
            FROM restricted_parking_bylaws
        ) b ORDER BY ord, id",
    )?;
    let mut rows = stmt.query([])?;

    let mut bylaws = Vec::new();
    while let Some(row) = rows.next()? {
        let kind_raw: String = row.get(0)?;
        bylaws.push(BylawRef {
            kind: parse_kind(&kind_raw)?,
            id: row.get(1)?,
            highway: row.get(2)?,
            between: row.get(3)?,
        });
    }

    Ok(bylaws)
}

/// Selects up to `limit` bylaws whose boundary pair exists but has at
/// least one intersection not yet conclusively geocoded, in insertion
/// order.
///
/// `NOT_FOUND` is not conclusive: those intersections are re-selected
/// until they succeed or the run's circuit breaker trips.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails.
pub fn select_bylaws_needing_update(
    conn: &Connection,
    limit: u64,
) -> Result<Vec<BylawBoundaries>, DbError> {
    let sql = format!(
        "SELECT b.kind, b.id,
                s.id, s.lat, s.lng, s.status,
                sm.id, sm.name, sm.street_end,
                sc.id, sc.name, sc.street_end,
                e.id, e.lat, e.lng, e.status,
                em.id, em.name, em.street_end,
                ec.id, ec.name, ec.street_end
         FROM (
             SELECT 'NO_PARKING' AS kind, 0 AS ord, id, boundary_start_id, boundary_end_id
             FROM no_parking_bylaws
             UNION ALL
             SELECT 'RESTRICTED_PARKING' AS kind, 1 AS ord, id, boundary_start_id, boundary_end_id
             FROM restricted_parking_bylaws
         ) b
         JOIN intersections s ON s.id = b.boundary_start_id
         JOIN intersections e ON e.id = b.boundary_end_id
         JOIN highways sm ON sm.id = s.main_street_id
         JOIN highways sc ON sc.id = s.cross_street_id
         JOIN highways em ON em.id = e.main_street_id
         JOIN highways ec ON ec.id = e.cross_street_id
         WHERE s.status NOT IN ('FOUND', 'SKIPPED')
            OR e.status NOT IN ('FOUND', 'SKIPPED')
         ORDER BY b.ord, b.id
         LIMIT {limit}"
    );

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query([])?;

    let mut bylaws = Vec::new();
    while let Some(row) = rows.next()? {
        let kind_raw: String = row.get(0)?;
        bylaws.push(BylawBoundaries {
            kind: parse_kind(&kind_raw)?,
            id: row.get(1)?,
            start: read_intersection(row, 2)?,
            end: read_intersection(row, 12)?,
        });
    }

    Ok(bylaws)
}

/// Persists staged intersection geocode results in one all-or-nothing
/// batch, writing only the lat/lng/status fields.
///
/// Returns the number of rows updated.
///
/// # Errors
///
/// Returns [`DbError`] if any update fails; the transaction is rolled
/// back and no row is changed.
pub fn batch_update_intersections(
    conn: &Connection,
    intersections: &[Intersection],
) -> Result<u64, DbError> {
    if intersections.is_empty() {
        return Ok(0);
    }

    conn.execute_batch("BEGIN TRANSACTION;")?;

    let result = (|| {
        let mut total = 0u64;
        let mut stmt = conn
            .prepare("UPDATE intersections SET lat = ?, lng = ?, status = ? WHERE id = ?")?;
        for intersection in intersections {
            let changed = stmt.execute(params![
                intersection.lat,
                intersection.lng,
                intersection.status.to_string(),
                intersection.id,
            ])?;
            if changed > 0 {
                total += 1;
            }
        }
        Ok::<u64, DbError>(total)
    })();

    match result {
        Ok(total) => {
            conn.execute_batch("COMMIT;")?;
            Ok(total)
        }
        Err(e) => {
            let _ = conn.execute_batch("ROLLBACK;");
            Err(e)
        }
    }
}

/// Persists staged bylaw boundary assignments in one all-or-nothing
/// batch.
///
/// Returns the number of rows updated. Bylaws not in `updates` are left
/// untouched — existing boundary references are never cleared here.
///
/// # Errors
///
/// Returns [`DbError`] if any update fails; the transaction is rolled
/// back and no row is changed.
pub fn batch_update_bylaw_boundaries(
    conn: &Connection,
    updates: &[BoundaryUpdate],
) -> Result<u64, DbError> {
    if updates.is_empty() {
        return Ok(0);
    }

    conn.execute_batch("BEGIN TRANSACTION;")?;

    let result = (|| {
        let mut total = 0u64;
        let mut no_parking = conn.prepare(
            "UPDATE no_parking_bylaws SET boundary_start_id = ?, boundary_end_id = ? WHERE id = ?",
        )?;
        let mut restricted = conn.prepare(
            "UPDATE restricted_parking_bylaws
             SET boundary_start_id = ?, boundary_end_id = ? WHERE id = ?",
        )?;
        for update in updates {
            let stmt = match update.kind {
                BylawKind::NoParking => &mut no_parking,
                BylawKind::RestrictedParking => &mut restricted,
            };
            let changed = stmt.execute(params![
                update.boundary_start_id,
                update.boundary_end_id,
                update.bylaw_id,
            ])?;
            if changed > 0 {
                total += 1;
            }
        }
        Ok::<u64, DbError>(total)
    })();

    match result {
        Ok(total) => {
            conn.execute_batch("COMMIT;")?;
            Ok(total)
        }
        Err(e) => {
            let _ = conn.execute_batch("ROLLBACK;");
            Err(e)
        }
    }
}

fn read_intersection(row: &duckdb::Row<'_>, offset: usize) -> Result<Intersection, DbError> {
    let status: String = row.get(offset + 3)?;
    Ok(Intersection {
        id: row.get(offset)?,
        lat: row.get(offset + 1)?,
        lng: row.get(offset + 2)?,
        status: parse_status(&status)?,
        main_street: Highway {
            id: row.get(offset + 4)?,
            name: row.get(offset + 5)?,
            street_end: parse_street_end(row.get(offset + 6)?)?,
        },
        cross_street: Highway {
            id: row.get(offset + 7)?,
            name: row.get(offset + 8)?,
            street_end: parse_street_end(row.get(offset + 9)?)?,
        },
    })
}

fn parse_street_end(raw: Option<String>) -> Result<Option<StreetEnd>, DbError> {
    raw.map(|s| {
        StreetEnd::from_str(&s).map_err(|_| DbError::Conversion {
            message: format!("Invalid street_end value: {s}"),
        })
    })
    .transpose()
}

fn parse_status(raw: &str) -> Result<GeocodeStatus, DbError> {
    GeocodeStatus::from_str(raw).map_err(|_| DbError::Conversion {
        message: format!("Invalid geocode status: {raw}"),
    })
}

fn parse_kind(raw: &str) -> Result<BylawKind, DbError> {
    BylawKind::from_str(raw).map_err(|_| DbError::Conversion {
        message: format!("Invalid bylaw kind: {raw}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;

    fn record(source_id: &str, highway: &str, between: &str) -> BylawRecord {
        BylawRecord {
            source_id: source_id.to_string(),
            highway: highway.to_string(),
            between: Some(between.to_string()),
            schedule: Some("15".to_string()),
            schedule_name: Some("Parking for Restricted Periods".to_string()),
            ..BylawRecord::default()
        }
    }

    #[test]
    fn get_or_create_highway_is_idempotent() {
        let conn = open_in_memory().unwrap();

        let first = get_or_create_highway(&conn, "Queen Street", Some(StreetEnd::West)).unwrap();
        let second = get_or_create_highway(&conn, "Queen Street", None).unwrap();

        assert_eq!(first.id, second.id);
        // First writer wins, including street_end.
        assert_eq!(second.street_end, Some(StreetEnd::West));
    }

    #[test]
    fn find_highway_matches_case_insensitively() {
        let conn = open_in_memory().unwrap();
        get_or_create_highway(&conn, "Oakwood Avenue", None).unwrap();

        let found = find_highway(&conn, "oakwood avenue").unwrap();
        assert_eq!(found.unwrap().name, "Oakwood Avenue");

        assert!(find_highway(&conn, "Niagara Street").unwrap().is_none());
    }

    #[test]
    fn get_or_create_intersection_never_duplicates_or_overwrites() {
        let conn = open_in_memory().unwrap();
        let main = get_or_create_highway(&conn, "Ashbury Avenue", None).unwrap();
        let cross = get_or_create_highway(&conn, "Glenholme Avenue", None).unwrap();

        let created = get_or_create_intersection(&conn, &main, &cross).unwrap();
        assert_eq!(created.status, GeocodeStatus::NotFetched);
        assert_eq!(created.lat, None);

        let mut resolved = created.clone();
        resolved.lat = Some(43.689_936);
        resolved.lng = Some(-79.442_908);
        resolved.status = GeocodeStatus::Found;
        batch_update_intersections(&conn, &[resolved]).unwrap();

        let again = get_or_create_intersection(&conn, &main, &cross).unwrap();
        assert_eq!(again.id, created.id);
        assert_eq!(again.status, GeocodeStatus::Found);
        assert_eq!(again.lat, Some(43.689_936));
        assert_eq!(again.lng, Some(-79.442_908));
    }

    #[test]
    fn insert_bylaw_dedupes_on_source_id() {
        let conn = open_in_memory().unwrap();
        let law = record("1", "Ashbury Avenue", "Glenholme Avenue and Oakwood Avenue");

        assert!(insert_bylaw(&conn, BylawKind::NoParking, &law, None, None).unwrap());
        assert!(!insert_bylaw(&conn, BylawKind::NoParking, &law, None, None).unwrap());

        assert_eq!(bylaw_count(&conn, BylawKind::NoParking).unwrap(), 1);
        assert_eq!(
            bylaw_count_for_source_id(&conn, BylawKind::NoParking, "1").unwrap(),
            1
        );
    }

    #[test]
    fn same_source_id_allowed_across_variants() {
        let conn = open_in_memory().unwrap();
        let law = record("1", "Ashbury Avenue", "Glenholme Avenue and Oakwood Avenue");

        assert!(insert_bylaw(&conn, BylawKind::NoParking, &law, None, None).unwrap());
        assert!(insert_bylaw(&conn, BylawKind::RestrictedParking, &law, None, None).unwrap());

        assert_eq!(bylaw_count(&conn, BylawKind::NoParking).unwrap(), 1);
        assert_eq!(bylaw_count(&conn, BylawKind::RestrictedParking).unwrap(), 1);
    }

    #[test]
    fn select_bylaws_needing_update_skips_conclusive_pairs() {
        let conn = open_in_memory().unwrap();
        let main = get_or_create_highway(&conn, "Ashbury Avenue", None).unwrap();
        let cross_a = get_or_create_highway(&conn, "Glenholme Avenue", None).unwrap();
        let cross_b = get_or_create_highway(&conn, "Oakwood Avenue", None).unwrap();

        let pending = get_or_create_intersection(&conn, &main, &cross_a).unwrap();
        let done = get_or_create_intersection(&conn, &main, &cross_b).unwrap();

        let mut resolved = done.clone();
        resolved.lat = Some(43.690_593);
        resolved.lng = Some(-79.440_109);
        resolved.status = GeocodeStatus::Found;
        batch_update_intersections(&conn, &[resolved]).unwrap();

        let open_law = record("1", "Ashbury Avenue", "irrelevant");
        let closed_law = record("2", "Ashbury Avenue", "irrelevant");
        insert_bylaw(&conn, BylawKind::NoParking, &open_law, None, None).unwrap();
        insert_bylaw(&conn, BylawKind::NoParking, &closed_law, None, None).unwrap();

        batch_update_bylaw_boundaries(
            &conn,
            &[
                BoundaryUpdate {
                    kind: BylawKind::NoParking,
                    bylaw_id: 1,
                    boundary_start_id: pending.id,
                    boundary_end_id: done.id,
                },
                BoundaryUpdate {
                    kind: BylawKind::NoParking,
                    bylaw_id: 2,
                    boundary_start_id: done.id,
                    boundary_end_id: done.id,
                },
            ],
        )
        .unwrap();

        let needing = select_bylaws_needing_update(&conn, 90).unwrap();
        assert_eq!(needing.len(), 1);
        assert_eq!(needing[0].id, 1);
        assert_eq!(needing[0].start.id, pending.id);
        assert_eq!(needing[0].start.main_street.name, "Ashbury Avenue");
        assert_eq!(needing[0].end.status, GeocodeStatus::Found);
    }

    #[test]
    fn select_bylaws_needing_update_respects_limit() {
        let conn = open_in_memory().unwrap();
        let main = get_or_create_highway(&conn, "Ashbury Avenue", None).unwrap();

        for i in 0..5i64 {
            let cross =
                get_or_create_highway(&conn, &format!("Cross Street {i}"), None).unwrap();
            let intersection = get_or_create_intersection(&conn, &main, &cross).unwrap();
            let law = record(&i.to_string(), "Ashbury Avenue", "irrelevant");
            insert_bylaw(&conn, BylawKind::NoParking, &law, None, None).unwrap();
            batch_update_bylaw_boundaries(
                &conn,
                &[BoundaryUpdate {
                    kind: BylawKind::NoParking,
                    bylaw_id: i + 1,
                    boundary_start_id: intersection.id,
                    boundary_end_id: intersection.id,
                }],
            )
            .unwrap();
        }

        let needing = select_bylaws_needing_update(&conn, 3).unwrap();
        assert_eq!(needing.len(), 3);
        // Insertion order.
        assert_eq!(needing[0].id, 1);
        assert_eq!(needing[2].id, 3);
    }

    #[test]
    fn boundary_update_is_reflected_on_lookup() {
        let conn = open_in_memory().unwrap();
        let main = get_or_create_highway(&conn, "Ashbury Avenue", None).unwrap();
        let cross = get_or_create_highway(&conn, "Glenholme Avenue", None).unwrap();
        let intersection = get_or_create_intersection(&conn, &main, &cross).unwrap();

        let law = record("1", "Ashbury Avenue", "irrelevant");
        insert_bylaw(&conn, BylawKind::NoParking, &law, None, None).unwrap();

        assert_eq!(
            boundary_refs_for_source(&conn, BylawKind::NoParking, "1").unwrap(),
            (None, None)
        );

        batch_update_bylaw_boundaries(
            &conn,
            &[BoundaryUpdate {
                kind: BylawKind::NoParking,
                bylaw_id: 1,
                boundary_start_id: intersection.id,
                boundary_end_id: intersection.id,
            }],
        )
        .unwrap();

        assert_eq!(
            boundary_refs_for_source(&conn, BylawKind::NoParking, "1").unwrap(),
            (Some(intersection.id), Some(intersection.id))
        );
    }
}
