#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Parking schedule dump handling.
//!
//! The city publishes the parking bylaw schedules as a zip archive
//! containing one XML document per bylaw category. [`dump`] downloads
//! and extracts the archive; [`records`] parses a document into
//! [`parking_map_bylaw_models::BylawRecord`]s.

pub mod dump;
pub mod records;

/// Errors that can occur during dump operations.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Zip extraction failed.
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// XML parsing failed.
    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// I/O error during download or extraction.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path that caused the error.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}
