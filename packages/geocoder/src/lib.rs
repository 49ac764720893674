#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Geocoding client for the parking map.
//!
//! Resolves a street intersection (main street + cross street) to a
//! latitude/longitude via geocoder.ca, which speaks XML and throttles
//! its free tier with HTTP 403. The transport retries 403s with
//! exponential backoff per the embedded [`service`] configuration;
//! every other transport failure fails the call immediately.
//!
//! Lookups are strictly sequential — the enrichment run awaits each
//! request (including its backoff sleeps) before issuing the next,
//! because the service is rate-limited.

pub mod geocoder_ca;
pub mod service;

use async_trait::async_trait;
use parking_map_bylaw_models::GeocodeStatus;
use thiserror::Error;

/// Outcome of one intersection lookup.
///
/// Coordinates are present exactly when the status is
/// [`GeocodeStatus::Found`].
#[derive(Debug, Clone, PartialEq)]
pub struct Geocode {
    /// Resolved latitude.
    pub lat: Option<f64>,
    /// Resolved longitude.
    pub lng: Option<f64>,
    /// How the lookup concluded.
    pub status: GeocodeStatus,
}

impl Geocode {
    /// A successful lookup with accepted coordinates.
    #[must_use]
    pub const fn found(lat: f64, lng: f64) -> Self {
        Self {
            lat: Some(lat),
            lng: Some(lng),
            status: GeocodeStatus::Found,
        }
    }

    /// A conclusive miss: error response or confidence below threshold.
    #[must_use]
    pub const fn not_found() -> Self {
        Self {
            lat: None,
            lng: None,
            status: GeocodeStatus::NotFound,
        }
    }

    /// A lookup short-circuited before any network call.
    #[must_use]
    pub const fn skipped() -> Self {
        Self {
            lat: None,
            lng: None,
            status: GeocodeStatus::Skipped,
        }
    }

    /// A transport give-up (retries exhausted or connection failure).
    #[must_use]
    pub const fn timed_out() -> Self {
        Self {
            lat: None,
            lng: None,
            status: GeocodeStatus::TimedOut,
        }
    }
}

/// Errors from geocoding operations.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// HTTP request failed (not retried).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Every retry attempt came back with a retryable status.
    #[error("Gave up after {attempts} attempts (last status {status})")]
    RetriesExhausted {
        /// Number of requests issued.
        attempts: u32,
        /// The last HTTP status received.
        status: u16,
    },

    /// The response body was not the XML document the service contract
    /// promises.
    #[error("Unexpected geocoder response: {message}")]
    UnexpectedFormat {
        /// Description of the format violation.
        message: String,
    },
}

impl GeocodeError {
    /// Whether this error counts as a transport give-up — the caller
    /// records it as [`GeocodeStatus::TimedOut`] and bumps its failure
    /// budget instead of aborting the run.
    #[must_use]
    pub const fn is_transport_failure(&self) -> bool {
        matches!(self, Self::Http(_) | Self::RetriesExhausted { .. })
    }
}

/// The seam between the enrichment run and the geocoding service.
#[async_trait]
pub trait IntersectionGeocoder: Send + Sync {
    /// Resolves the (main, cross) street pair to a [`Geocode`] outcome.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError`] on transport failure or a response that
    /// violates the service's XML contract.
    async fn fetch(&self, main_street: &str, cross_street: &str)
    -> Result<Geocode, GeocodeError>;
}
