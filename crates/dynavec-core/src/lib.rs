//! dynavec core: dynamic-label metric vectors with expiry and a
//! cardinality safety valve.
//!
//! A [`Vector`] caches one metric cell per unique label-value combination,
//! where the set of label *keys* is discovered at runtime. Keys observed
//! for the first time are appended to a positional registry without
//! invalidating cells created before the key existed. Memory is bounded by
//! time-based expiry and a maximum-cardinality cutoff, both enforced by a
//! timer-driven [`Vector::gc`].
//!
//! This crate carries no runtime or transport dependencies; the collection
//! side (registry, text exposition, HTTP) lives in `dynavec-exporter`.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths surface as [`DynaVecError`]/[`Result`]; capacity
//! exhaustion is a recoverable error, never an abort.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod counter;
pub mod curry;
pub mod desc;
pub mod error;
pub mod gauge;
pub mod histogram;
pub mod labels;
pub mod metric;
pub mod opts;
pub mod vector;

pub use counter::{CounterCell, CounterVec};
pub use curry::Curried;
pub use desc::Desc;
pub use error::{DynaVecError, Result};
pub use gauge::{GaugeCell, GaugeVec};
pub use histogram::{HistogramCell, HistogramVec};
pub use labels::{LabelSet, Labels};
pub use metric::{Bucket, Collector, Metric, MetricKind, MetricValue, Sample};
pub use opts::Opts;
pub use vector::{CellContext, GcOutcome, Vector};
