#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Parking bylaw domain types.
//!
//! This crate defines the entities shared across the parking map system:
//! highways (streets named by bylaws), intersections (pairs of highways
//! with an optional resolved coordinate), and the two bylaw record
//! variants found in the city's parking schedule dumps.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Which end of a street a highway entry refers to, when the dump
/// disambiguates segments of long streets (e.g. "Queen Street W").
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display,
    EnumString, AsRefStr,
)]
pub enum StreetEnd {
    /// North segment.
    #[strum(serialize = "N")]
    North,
    /// South segment.
    #[strum(serialize = "S")]
    South,
    /// East segment.
    #[strum(serialize = "E")]
    East,
    /// West segment.
    #[strum(serialize = "W")]
    West,
}

impl StreetEnd {
    /// Returns the full word for this direction (e.g. `"West"`).
    #[must_use]
    pub const fn word(self) -> &'static str {
        match self {
            Self::North => "North",
            Self::South => "South",
            Self::East => "East",
            Self::West => "West",
        }
    }
}

/// Resolution state of an intersection's geocode lookup.
///
/// Persisted as TEXT in the `intersections` table. `Found` and `Skipped`
/// are conclusive: their coordinates are final and the enrichment run
/// never re-fetches them. `NotFound` is retried on later runs.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum GeocodeStatus {
    /// No lookup attempted yet.
    NotFetched,
    /// Geocoder returned coordinates with acceptable confidence.
    Found,
    /// Geocoder answered conclusively without a usable coordinate
    /// (error element, or confidence below the acceptance threshold).
    NotFound,
    /// Lookup skipped without a network call (a street name was empty).
    Skipped,
    /// Transport gave up (retries exhausted or connection failure).
    TimedOut,
}

impl GeocodeStatus {
    /// Whether this status is final — the enrichment run skips
    /// intersections whose status is conclusive.
    #[must_use]
    pub const fn is_conclusive(self) -> bool {
        matches!(self, Self::Found | Self::Skipped)
    }
}

/// The two bylaw variants in the parking schedule dumps.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum BylawKind {
    /// Blanket no-parking rules.
    NoParking,
    /// Time/duration-restricted parking rules.
    RestrictedParking,
}

impl BylawKind {
    /// Returns the database table holding this variant's rows.
    #[must_use]
    pub const fn table(self) -> &'static str {
        match self {
            Self::NoParking => "no_parking_bylaws",
            Self::RestrictedParking => "restricted_parking_bylaws",
        }
    }

    /// Returns the dump document filename for this variant.
    #[must_use]
    pub const fn dump_file(self) -> &'static str {
        match self {
            Self::NoParking => "no_parking.xml",
            Self::RestrictedParking => "restricted_parking.xml",
        }
    }
}

/// A street named by at least one bylaw.
///
/// Identity is by name: the first import of a name wins and later
/// occurrences reuse the existing row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Highway {
    /// Database row id.
    pub id: i64,
    /// Street name as it appears in the dump (direction token stripped).
    pub name: String,
    /// Directional segment marker, when the dump carried one.
    pub street_end: Option<StreetEnd>,
}

impl std::fmt::Display for Highway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.street_end {
            Some(end) => write!(f, "{} ({})", self.name, end.word()),
            None => write!(f, "{}", self.name),
        }
    }
}

/// The meeting point of two highways, with its geocode state.
///
/// Unique per ordered (main, cross) pair. Coordinates and status are
/// only ever written by the enrichment run's batch commit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intersection {
    /// Database row id.
    pub id: i64,
    /// The bylaw's own street.
    pub main_street: Highway,
    /// The cross street named in the bylaw's "between" text.
    pub cross_street: Highway,
    /// Resolved latitude, when status is `Found`.
    pub lat: Option<f64>,
    /// Resolved longitude, when status is `Found`.
    pub lng: Option<f64>,
    /// Geocode resolution state.
    pub status: GeocodeStatus,
}

impl std::fmt::Display for Intersection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} at {} ({})",
            self.main_street.name, self.cross_street.name, self.status
        )
    }
}

/// One record from a parking schedule dump, field-by-field as published.
///
/// Every field except `source_id` and `highway` is optional because the
/// dumps omit elements freely. The variant-specific fields
/// (`prohibited_times_and_or_days` vs `times_and_or_days` /
/// `max_period_permitted`) are both carried here; the import step writes
/// whichever ones the target table has.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BylawRecord {
    /// Source identifier, unique per bylaw variant. Dedup key on import.
    pub source_id: String,
    /// Bylaw number, including repeal annotations.
    pub bylaw_no: Option<String>,
    /// Schedule number.
    pub schedule: Option<String>,
    /// Schedule display name.
    pub schedule_name: Option<String>,
    /// Raw street text, possibly with a trailing direction token.
    pub highway: String,
    /// Side of the street the rule applies to.
    pub side: Option<String>,
    /// Free-text "between street A and street B" boundary description.
    pub between: Option<String>,
    /// No-parking variant: when parking is prohibited.
    pub prohibited_times_and_or_days: Option<String>,
    /// Restricted variant: when the restriction applies.
    pub times_and_or_days: Option<String>,
    /// Restricted variant: the longest permitted stay.
    pub max_period_permitted: Option<String>,
}
