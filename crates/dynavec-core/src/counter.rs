//! Counter cells: monotonically accumulating float values.

use std::time::Instant;

use parking_lot::RwLock;

use crate::error::Result;
use crate::metric::{Metric, MetricKind, MetricValue, Sample};
use crate::opts::Opts;
use crate::vector::{CellContext, Vector};

/// A counter vector: one [`CounterCell`] per label combination.
pub type CounterVec = Vector<CounterCell>;

impl CounterVec {
    pub fn new(opts: Opts) -> Result<Self> {
        Vector::with_constructor(opts, MetricKind::Counter, CounterCell::build)
    }
}

/// One counter instance. Value state lives behind the cell's own lock so
/// increments never contend with store-level operations.
pub struct CounterCell {
    ctx: CellContext<CounterCell>,
    state: RwLock<CounterState>,
}

struct CounterState {
    value: f64,
    last: Instant,
}

impl CounterCell {
    fn build(ctx: CellContext<CounterCell>) -> Self {
        Self {
            ctx,
            state: RwLock::new(CounterState {
                value: 0.0,
                last: Instant::now(),
            }),
        }
    }

    /// Increment by 1.
    pub fn inc(&self) {
        self.add(1.0);
    }

    /// Increment by an arbitrary value.
    pub fn add(&self, v: f64) {
        let mut state = self.state.write();
        state.value += v;
        state.last = Instant::now();
    }

    /// Current value.
    pub fn value(&self) -> f64 {
        self.state.read().value
    }
}

impl Metric for CounterCell {
    fn last_edit(&self) -> Instant {
        self.state.read().last
    }

    fn sample(&self) -> Sample {
        let value = self.state.read().value;
        Sample {
            labels: self.ctx.expand(),
            value: MetricValue::Counter(value),
        }
    }
}
