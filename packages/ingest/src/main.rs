#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the parking bylaw ingestion tool.

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};
use parking_map_database::{db, paths};
use parking_map_geocoder::geocoder_ca::GeocoderCa;
use parking_map_geocoder::service::default_service;
use parking_map_ingest::enrich::{self, EnrichOptions};
use parking_map_ingest::{boundaries, import};
use parking_map_source::dump;

#[derive(Parser)]
#[command(name = "parking_map_ingest", about = "Parking bylaw ingestion tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download the parking schedule dump and extract its documents
    FetchDump {
        /// Override the dump download URL
        #[arg(long)]
        url: Option<String>,
        /// Directory to extract the documents into
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
    /// Import the extracted dump documents into the database
    Import {
        /// Directory holding the extracted documents
        #[arg(long)]
        fixtures_dir: Option<PathBuf>,
    },
    /// Resolve bylaw "between" fields into boundary intersections
    Resolve,
    /// Geocode boundary intersections that still need coordinates
    Geocode {
        /// Maximum bylaws to process this run
        #[arg(long, default_value_t = enrich::MAX_BYLAWS_PER_RUN)]
        limit: u64,
        /// Timed-out lookups tolerated before stopping early
        #[arg(long, default_value_t = enrich::TIMEOUT_BUDGET)]
        timeout_budget: u32,
    },
    /// Fetch, import, resolve, and geocode in one go
    Pipeline,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::FetchDump { url, out_dir } => {
            fetch_dump(url, out_dir).await?;
        }
        Commands::Import { fixtures_dir } => {
            let conn = db::open_default()?;
            let dir = fixtures_dir.unwrap_or_else(paths::fixtures_dir);
            let summary = import::import_dir(&conn, &dir)?;
            log::info!(
                "Import complete: {} inserted, {} skipped",
                summary.inserted,
                summary.skipped
            );
        }
        Commands::Resolve => {
            let conn = db::open_default()?;
            let summary = boundaries::resolve_boundaries(&conn)?;
            log::info!(
                "Resolve complete: {}/{} bylaw(s) have boundaries ({} row(s) written)",
                summary.resolved,
                summary.scanned,
                summary.updated_rows
            );
        }
        Commands::Geocode {
            limit,
            timeout_budget,
        } => {
            let conn = db::open_default()?;
            run_geocode(
                &conn,
                EnrichOptions {
                    limit,
                    timeout_budget,
                },
            )
            .await?;
        }
        Commands::Pipeline => {
            fetch_dump(None, None).await?;
            let conn = db::open_default()?;
            let summary = import::import_dir(&conn, &paths::fixtures_dir())?;
            log::info!(
                "Import complete: {} inserted, {} skipped",
                summary.inserted,
                summary.skipped
            );
            boundaries::resolve_boundaries(&conn)?;
            run_geocode(&conn, EnrichOptions::default()).await?;
        }
    }

    Ok(())
}

async fn fetch_dump(
    url: Option<String>,
    out_dir: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let url = url.unwrap_or_else(|| dump::DEFAULT_DUMP_URL.to_string());
    let out_dir = out_dir.unwrap_or_else(paths::fixtures_dir);
    let archive_path = paths::dump_archive_path();

    let client = reqwest::Client::builder()
        .user_agent("parking-map/1.0")
        .build()?;

    dump::fetch_archive(&client, &url, &archive_path).await?;
    let count = dump::unzip_archive(&archive_path, &out_dir)?;
    log::info!("Dump ready: {count} document(s) in {}", out_dir.display());

    Ok(())
}

async fn run_geocode(
    conn: &duckdb::Connection,
    options: EnrichOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let geocoder = GeocoderCa::new(default_service())?;

    let start = Instant::now();
    let summary = enrich::enrich(conn, &geocoder, options).await?;
    let elapsed = start.elapsed();

    log::info!(
        "Geocoding complete: {} bylaw(s) selected, {} found, {} not found, {} timed out, took {:.1}s",
        summary.selected,
        summary.found,
        summary.not_found,
        summary.timed_out,
        elapsed.as_secs_f64()
    );
    if summary.breaker_tripped {
        log::warn!("Run stopped early after hitting the timeout budget");
    }

    Ok(())
}
