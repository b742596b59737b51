//! Gauge cells: values that can move in both directions.

use std::time::{Instant, SystemTime, UNIX_EPOCH};

use parking_lot::RwLock;

use crate::error::Result;
use crate::metric::{Metric, MetricKind, MetricValue, Sample};
use crate::opts::Opts;
use crate::vector::{CellContext, Vector};

/// A gauge vector: one [`GaugeCell`] per label combination.
pub type GaugeVec = Vector<GaugeCell>;

impl GaugeVec {
    pub fn new(opts: Opts) -> Result<Self> {
        Vector::with_constructor(opts, MetricKind::Gauge, GaugeCell::build)
    }
}

/// One gauge instance.
pub struct GaugeCell {
    ctx: CellContext<GaugeCell>,
    state: RwLock<GaugeState>,
}

struct GaugeState {
    value: f64,
    last: Instant,
}

impl GaugeCell {
    fn build(ctx: CellContext<GaugeCell>) -> Self {
        Self {
            ctx,
            state: RwLock::new(GaugeState {
                value: 0.0,
                last: Instant::now(),
            }),
        }
    }

    /// Set to a specific value.
    pub fn set(&self, v: f64) {
        let mut state = self.state.write();
        state.value = v;
        state.last = Instant::now();
    }

    /// Increment by 1.
    pub fn inc(&self) {
        self.add(1.0);
    }

    /// Decrement by 1.
    pub fn dec(&self) {
        self.add(-1.0);
    }

    /// Add a signed delta.
    pub fn add(&self, v: f64) {
        let mut state = self.state.write();
        state.value += v;
        state.last = Instant::now();
    }

    /// Subtract a delta.
    pub fn sub(&self, v: f64) {
        self.add(-v);
    }

    /// Set to the current unix time in seconds. A clock before the epoch
    /// reads as 0.
    pub fn set_to_current_time(&self) {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0);
        self.set(now);
    }

    /// Current value.
    pub fn value(&self) -> f64 {
        self.state.read().value
    }
}

impl Metric for GaugeCell {
    fn last_edit(&self) -> Instant {
        self.state.read().last
    }

    fn sample(&self) -> Sample {
        let value = self.state.read().value;
        Sample {
            labels: self.ctx.expand(),
            value: MetricValue::Gauge(value),
        }
    }
}
