//! Histogram cells: cumulative bucket counts with sum and count.

use std::sync::Arc;
use std::time::Instant;

use parking_lot::RwLock;

use crate::error::{DynaVecError, Result};
use crate::metric::{Bucket, Metric, MetricKind, MetricValue, Sample};
use crate::opts::Opts;
use crate::vector::{CellContext, Vector};

/// A histogram vector: one [`HistogramCell`] per label combination.
/// Bucket bounds are fixed at construction and shared by all cells.
pub type HistogramVec = Vector<HistogramCell>;

impl HistogramVec {
    pub fn new(opts: Opts) -> Result<Self> {
        validate_buckets(&opts.buckets)?;
        let bounds: Arc<[f64]> = Arc::from(opts.buckets.clone());
        Vector::with_constructor(opts, MetricKind::Histogram, move |ctx| {
            HistogramCell::build(ctx, Arc::clone(&bounds))
        })
    }
}

fn validate_buckets(buckets: &[f64]) -> Result<()> {
    for pair in buckets.windows(2) {
        if pair[0] >= pair[1] {
            return Err(DynaVecError::InvalidOpts(
                "buckets must be strictly increasing".into(),
            ));
        }
    }
    if buckets.iter().any(|b| !b.is_finite()) {
        return Err(DynaVecError::InvalidOpts("buckets must be finite".into()));
    }
    Ok(())
}

/// One histogram instance.
pub struct HistogramCell {
    ctx: CellContext<HistogramCell>,
    bounds: Arc<[f64]>,
    state: RwLock<HistogramState>,
}

struct HistogramState {
    sum: f64,
    count: u64,
    buckets: Vec<u64>,
    last: Instant,
}

impl HistogramCell {
    fn build(ctx: CellContext<HistogramCell>, bounds: Arc<[f64]>) -> Self {
        let buckets = vec![0; bounds.len()];
        Self {
            ctx,
            bounds,
            state: RwLock::new(HistogramState {
                sum: 0.0,
                count: 0,
                buckets,
                last: Instant::now(),
            }),
        }
    }

    /// Record one observation: counted in every bucket whose upper bound
    /// is at or above the value.
    pub fn observe(&self, v: f64) {
        let mut state = self.state.write();
        for (i, bound) in self.bounds.iter().enumerate() {
            if v <= *bound {
                state.buckets[i] += 1;
            }
        }
        state.count += 1;
        state.sum += v;
        state.last = Instant::now();
    }

    /// Total of all observed values.
    pub fn sum(&self) -> f64 {
        self.state.read().sum
    }

    /// Number of observations.
    pub fn count(&self) -> u64 {
        self.state.read().count
    }
}

impl Metric for HistogramCell {
    fn last_edit(&self) -> Instant {
        self.state.read().last
    }

    fn sample(&self) -> Sample {
        let state = self.state.read();
        let buckets = self
            .bounds
            .iter()
            .zip(&state.buckets)
            .map(|(bound, cumulative)| Bucket {
                upper_bound: *bound,
                cumulative: *cumulative,
            })
            .collect();
        let value = MetricValue::Histogram {
            sum: state.sum,
            count: state.count,
            buckets,
        };
        drop(state);
        Sample {
            labels: self.ctx.expand(),
            value,
        }
    }
}
