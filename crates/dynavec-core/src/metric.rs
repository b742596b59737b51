//! Capability seam between the store and kind-specific cells, plus the
//! snapshot types handed to the collection protocol.

use std::sync::Arc;
use std::time::Instant;

use crate::desc::Desc;
use crate::labels::Labels;

/// Metric kind, carried by the descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Counter,
    Gauge,
    Histogram,
}

impl MetricKind {
    /// Exposition type string.
    pub fn as_str(self) -> &'static str {
        match self {
            MetricKind::Counter => "counter",
            MetricKind::Gauge => "gauge",
            MetricKind::Histogram => "histogram",
        }
    }
}

/// One cumulative histogram bucket.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bucket {
    /// Inclusive upper bound.
    pub upper_bound: f64,
    /// Observations at or below the bound.
    pub cumulative: u64,
}

/// Kind-specific value payload of a sample.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue {
    Counter(f64),
    Gauge(f64),
    Histogram {
        sum: f64,
        count: u64,
        buckets: Vec<Bucket>,
    },
}

/// Point-in-time rendering of one cell: its fully expanded label map
/// (positional values paired with key names, constants merged) and its
/// value payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub labels: Labels,
    pub value: MetricValue,
}

/// Capability interface a cell provides to its owning vector: a
/// last-modified accessor for the expiry policy and a serialization hook
/// for the collection protocol.
pub trait Metric: Send + Sync + 'static {
    /// Last time the cell's value was mutated.
    fn last_edit(&self) -> Instant;

    /// Render the cell into a protocol snapshot.
    fn sample(&self) -> Sample;
}

/// Surface a vector exposes to the collection protocol. Implemented by
/// every `Vector<M>`; the exporter registry holds collectors as trait
/// objects.
pub trait Collector: Send + Sync {
    /// Current schema descriptor.
    fn describe(&self) -> Arc<Desc>;

    /// Samples of all live, non-evicted cells. The store snapshot is
    /// taken under a shared lock and released before cells are sampled.
    fn collect_samples(&self) -> Vec<Sample>;
}
