#![allow(clippy::module_name_repetitions)]
//! Canonical file paths for the `data/` directory.

use std::path::{Path, PathBuf};

/// Returns the workspace root directory.
///
/// Resolved at compile time from `CARGO_MANIFEST_DIR`.
///
/// # Panics
///
/// Panics if the project root cannot be resolved.
#[must_use]
pub fn project_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .ancestors()
        .nth(2)
        .expect("Failed to find project root from CARGO_MANIFEST_DIR")
        .to_path_buf()
}

/// Returns the `data/` directory path.
#[must_use]
pub fn data_dir() -> PathBuf {
    project_root().join("data")
}

/// Returns the path for the parking map `DuckDB` file.
#[must_use]
pub fn parking_db_path() -> PathBuf {
    data_dir().join("parking_map.duckdb")
}

/// Returns the `data/fixtures/` directory the dump documents are
/// extracted into.
#[must_use]
pub fn fixtures_dir() -> PathBuf {
    data_dir().join("fixtures")
}

/// Returns the download path for the zipped parking schedule dump.
#[must_use]
pub fn dump_archive_path() -> PathBuf {
    data_dir().join("parking_schedules.zip")
}

/// Ensures a directory exists, creating it if necessary.
///
/// # Errors
///
/// Returns an I/O error if the directory cannot be created.
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}
