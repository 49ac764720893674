#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Library for importing parking bylaw dumps and enriching them with
//! geocoded intersection boundaries.
//!
//! The pipeline runs in three stages, each idempotent:
//!
//! 1. [`import`] — dump records become bylaw rows (deduplicated by
//!    source identifier) and highway rows.
//! 2. [`boundaries`] — every bylaw whose "between" text resolves to two
//!    known highways gets a pair of boundary intersections.
//! 3. [`enrich`] — boundary intersections are geocoded, a bounded batch
//!    per run, behind a timed-out circuit breaker.

pub mod between;
pub mod boundaries;
pub mod enrich;
pub mod import;
