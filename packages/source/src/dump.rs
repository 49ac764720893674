//! Downloading and extracting the zipped parking schedule dump.
//!
//! The archive is written atomically (to a temp file first, then
//! renamed) to avoid leaving a corrupt download if interrupted. The two
//! schedule documents inside are extracted flat into the fixtures
//! directory.

use std::path::Path;

use crate::SourceError;

/// Default download location for the city's parking schedule dump.
pub const DEFAULT_DUMP_URL: &str =
    "https://ckan0.cf.opendata.inter.prod-toronto.ca/dataset/parking-bylaws/resource/parking_schedules.zip";

/// Downloads the dump archive to `archive_path`.
///
/// Returns the archive size in bytes.
///
/// # Errors
///
/// Returns [`SourceError`] if the request fails, the server answers
/// with an error status, or the archive cannot be written.
pub async fn fetch_archive(
    client: &reqwest::Client,
    url: &str,
    archive_path: &Path,
) -> Result<u64, SourceError> {
    log::info!("Downloading {url} -> {}", archive_path.display());

    let bytes = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .bytes()
        .await?;

    if let Some(parent) = archive_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
    }

    let tmp_path = archive_path.with_extension("zip.tmp");
    std::fs::write(&tmp_path, &bytes).map_err(|e| io_error(&tmp_path, e))?;
    std::fs::rename(&tmp_path, archive_path).map_err(|e| io_error(archive_path, e))?;

    let size = std::fs::metadata(archive_path)
        .map(|m| m.len())
        .unwrap_or(0);

    #[allow(clippy::cast_precision_loss)]
    let mb = size as f64 / 1_048_576.0;
    log::info!("  archive size: {mb:.1} MB");

    Ok(size)
}

/// Extracts the dump archive's documents flat into `dest_dir`.
///
/// Returns the number of files extracted.
///
/// # Errors
///
/// Returns [`SourceError`] if the archive cannot be read or a document
/// cannot be written.
pub fn unzip_archive(archive_path: &Path, dest_dir: &Path) -> Result<u64, SourceError> {
    log::info!(
        "Unpacking {} -> {}",
        archive_path.display(),
        dest_dir.display()
    );

    std::fs::create_dir_all(dest_dir).map_err(|e| io_error(dest_dir, e))?;

    let file = std::fs::File::open(archive_path).map_err(|e| io_error(archive_path, e))?;
    let mut archive = zip::ZipArchive::new(file)?;

    let mut count = 0u64;
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        if entry.is_dir() {
            continue;
        }
        let Some(name) = entry
            .enclosed_name()
            .and_then(|p| p.file_name().map(std::ffi::OsStr::to_os_string))
        else {
            continue;
        };

        let dest = dest_dir.join(&name);
        let mut out = std::fs::File::create(&dest).map_err(|e| io_error(&dest, e))?;
        std::io::copy(&mut entry, &mut out).map_err(|e| io_error(&dest, e))?;
        log::info!("  extracted {}", dest.display());
        count += 1;
    }

    Ok(count)
}

fn io_error(path: &Path, source: std::io::Error) -> SourceError {
    SourceError::Io {
        path: path.display().to_string(),
        source,
    }
}
