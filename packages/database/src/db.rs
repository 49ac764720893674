//! Database connection and schema.

use std::path::Path;

use duckdb::Connection;

use crate::DbError;

/// Opens (or creates) the parking map `DuckDB` and ensures the schema
/// exists.
///
/// # Errors
///
/// Returns [`DbError`] if the connection or schema creation fails.
pub fn open(path: &Path) -> Result<Connection, DbError> {
    if let Some(parent) = path.parent() {
        crate::paths::ensure_dir(parent)?;
    }

    let conn = Connection::open(path)?;
    create_schema(&conn)?;
    log::debug!("Opened parking map database at {}", path.display());
    Ok(conn)
}

/// Opens the parking map database at the default path.
///
/// # Errors
///
/// Returns [`DbError`] if the connection or schema creation fails.
pub fn open_default() -> Result<Connection, DbError> {
    open(&crate::paths::parking_db_path())
}

/// Opens an in-memory database with the schema applied.
///
/// # Errors
///
/// Returns [`DbError`] if the connection or schema creation fails.
pub fn open_in_memory() -> Result<Connection, DbError> {
    let conn = Connection::open_in_memory()?;
    create_schema(&conn)?;
    Ok(conn)
}

fn create_schema(conn: &Connection) -> Result<(), DbError> {
    conn.execute_batch(
        "CREATE SEQUENCE IF NOT EXISTS highways_id_seq START 1;
        CREATE SEQUENCE IF NOT EXISTS intersections_id_seq START 1;
        CREATE SEQUENCE IF NOT EXISTS no_parking_bylaws_id_seq START 1;
        CREATE SEQUENCE IF NOT EXISTS restricted_parking_bylaws_id_seq START 1;

        CREATE TABLE IF NOT EXISTS highways (
            id BIGINT PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            street_end TEXT
        );

        CREATE TABLE IF NOT EXISTS intersections (
            id BIGINT PRIMARY KEY,
            main_street_id BIGINT NOT NULL,
            cross_street_id BIGINT NOT NULL,
            lat DOUBLE,
            lng DOUBLE,
            status TEXT NOT NULL DEFAULT 'NOT_FETCHED',
            UNIQUE (main_street_id, cross_street_id)
        );

        CREATE TABLE IF NOT EXISTS no_parking_bylaws (
            id BIGINT PRIMARY KEY,
            source_id TEXT NOT NULL UNIQUE,
            bylaw_no TEXT,
            schedule TEXT,
            schedule_name TEXT,
            highway TEXT NOT NULL,
            side TEXT,
            between_streets TEXT,
            between_street_a TEXT,
            between_street_b TEXT,
            prohibited_times_and_or_days TEXT,
            boundary_start_id BIGINT,
            boundary_end_id BIGINT
        );

        CREATE TABLE IF NOT EXISTS restricted_parking_bylaws (
            id BIGINT PRIMARY KEY,
            source_id TEXT NOT NULL UNIQUE,
            bylaw_no TEXT,
            schedule TEXT,
            schedule_name TEXT,
            highway TEXT NOT NULL,
            side TEXT,
            between_streets TEXT,
            between_street_a TEXT,
            between_street_b TEXT,
            times_and_or_days TEXT,
            max_period_permitted TEXT,
            boundary_start_id BIGINT,
            boundary_end_id BIGINT
        );",
    )?;
    Ok(())
}
