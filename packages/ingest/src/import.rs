//! Importing dump records into the database.
//!
//! Each record becomes one bylaw row, deduplicated by `source_id`, and
//! its highway text becomes a `highways` row on first sight. The
//! derived `between_street_a`/`between_street_b` columns keep the raw
//! halves of the two-way split (qualifier clauses included); qualifier
//! stripping happens later, during boundary resolution.

use std::path::Path;
use std::str::FromStr as _;
use std::sync::LazyLock;

use duckdb::Connection;
use parking_map_bylaw_models::{BylawKind, BylawRecord, StreetEnd};
use parking_map_database::{DbError, queries};
use regex::Regex;

/// Trailing standalone direction token on a highway name
/// (e.g. "Keele Street N").
static DIRECTION_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+([NSEW])$").expect("valid regex"));

/// Counts from one import pass.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImportSummary {
    /// Rows inserted.
    pub inserted: u64,
    /// Records skipped (duplicate `source_id` or no highway).
    pub skipped: u64,
}

/// Splits a highway's raw dump text into its name and optional
/// direction marker.
///
/// Only a trailing standalone single-letter token is stripped
/// (`"Keele Street N"` → `("Keele Street", North)`); full-word
/// directions stay in the name so that "between" text referencing the
/// full name keeps matching.
#[must_use]
pub fn parse_highway_name(raw: &str) -> (String, Option<StreetEnd>) {
    let trimmed = raw.trim();
    if let Some(captures) = DIRECTION_SUFFIX_RE.captures(trimmed) {
        // The capture is guaranteed to be one of N/S/E/W by the regex.
        let end = StreetEnd::from_str(&captures[1]).ok();
        let name = DIRECTION_SUFFIX_RE.replace(trimmed, "").into_owned();
        return (name, end);
    }
    (trimmed.to_string(), None)
}

/// Imports parsed records into one bylaw table.
///
/// Re-importing the same records is a no-op: rows are keyed by
/// `source_id` and duplicates are skipped.
///
/// # Errors
///
/// Returns [`DbError`] if any database operation fails.
pub fn import_records(
    conn: &Connection,
    kind: BylawKind,
    records: &[BylawRecord],
) -> Result<ImportSummary, DbError> {
    let mut summary = ImportSummary::default();

    for record in records {
        let (name, street_end) = parse_highway_name(&record.highway);
        if name.is_empty() {
            log::warn!("Record {} has no highway, skipping", record.source_id);
            summary.skipped += 1;
            continue;
        }

        queries::get_or_create_highway(conn, &name, street_end)?;

        let (between_a, between_b) = split_between(record.between.as_deref());
        let inserted = queries::insert_bylaw(
            conn,
            kind,
            record,
            between_a.as_deref(),
            between_b.as_deref(),
        )?;

        if inserted {
            summary.inserted += 1;
        } else {
            summary.skipped += 1;
        }
    }

    Ok(summary)
}

/// Imports both dump documents from a fixtures directory.
///
/// # Errors
///
/// Returns an error if a document cannot be read or a database
/// operation fails.
pub fn import_dir(
    conn: &Connection,
    fixtures_dir: &Path,
) -> Result<ImportSummary, Box<dyn std::error::Error>> {
    let mut total = ImportSummary::default();

    for kind in [BylawKind::NoParking, BylawKind::RestrictedParking] {
        let path = fixtures_dir.join(kind.dump_file());
        let records = parking_map_source::records::load_records(&path)?;
        log::info!(
            "{kind}: parsed {} record(s) from {}",
            records.len(),
            path.display()
        );

        let summary = import_records(conn, kind, &records)?;
        log::info!(
            "{kind}: {} inserted, {} skipped",
            summary.inserted,
            summary.skipped
        );

        total.inserted += summary.inserted;
        total.skipped += summary.skipped;
    }

    Ok(total)
}

/// Raw two-way split of the "between" text for the derived columns.
fn split_between(between: Option<&str>) -> (Option<String>, Option<String>) {
    let Some(between) = between else {
        return (None, None);
    };
    let parts: Vec<&str> = between.split(" and ").collect();
    if parts.len() != 2 {
        return (None, None);
    }
    (Some(parts[0].to_string()), Some(parts[1].to_string()))
}
