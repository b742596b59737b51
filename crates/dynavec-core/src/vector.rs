//! Concurrent store of metric cells keyed by label hash.
//!
//! One reader/writer lock per vector guards the label registry, the
//! instance map, the descriptor, and the pseudo length as a single unit;
//! creating a cell and rebuilding the descriptor on new-key discovery
//! appear atomic to readers. Cells guard their own value state with an
//! independent lock, so value mutation never contends with structural
//! operations here.

use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::RwLock;

use crate::desc::Desc;
use crate::error::{DynaVecError, Result};
use crate::labels::{LabelSet, Labels};
use crate::metric::{Collector, Metric, MetricKind, Sample};
use crate::opts::Opts;

/// Outcome of one [`Vector::gc`] pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GcOutcome {
    /// Cells removed, expired and cardinality-evicted combined.
    pub deleted: usize,
    /// True when the pass ended in a cardinality-triggered reset.
    pub limit_exceeded: bool,
}

/// Handed to the kind-specific constructor; owned by the cell afterwards.
///
/// Carries the cell's positional label values and a non-owning handle to
/// the vector's shared state, used for descriptor access and label
/// expansion only. Expansion takes the vector's shared lock: do not call
/// [`CellContext::expand`] from inside a constructor callback.
pub struct CellContext<M: Metric> {
    vector: Weak<RwLock<VectorInner<M>>>,
    values: Vec<String>,
}

impl<M: Metric> CellContext<M> {
    /// Positional label values fixed at creation time. May be shorter
    /// than the registry's current key list; missing trailing values
    /// read as `""`.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Full label map: positional values paired with the registry's
    /// current key names, constants merged. Empty when the owning vector
    /// is gone.
    pub fn expand(&self) -> Labels {
        match self.vector.upgrade() {
            Some(inner) => inner.read().labels.expand(&self.values),
            None => Labels::new(),
        }
    }

    /// Current descriptor of the owning vector, if it still exists.
    pub fn desc(&self) -> Option<Arc<Desc>> {
        self.vector.upgrade().map(|inner| inner.read().desc.clone())
    }
}

type MetricFn<M> = Box<dyn Fn(CellContext<M>) -> M + Send + Sync>;

/// A dynamic-label metric vector: get-or-create cache of cells keyed by
/// the hash of their label-value combination, with time-based expiry and
/// a maximum-cardinality cutoff.
pub struct Vector<M: Metric> {
    name: String,
    help: String,
    kind: MetricKind,
    expire: Duration,
    max_length: usize,
    make: MetricFn<M>,
    inner: Arc<RwLock<VectorInner<M>>>,
}

struct VectorInner<M: Metric> {
    labels: LabelSet,
    metrics: HashMap<u64, Arc<M>>,
    desc: Arc<Desc>,
    /// Remembered size of a cardinality-triggered reset; feeds `len()`
    /// until the next successful create clears it.
    pseudo_len: usize,
}

impl<M: Metric> VectorInner<M> {
    fn new(name: &str, help: &str, kind: MetricKind, constant: Labels) -> Self {
        let labels = LabelSet::new(constant);
        let desc = Arc::new(Desc::new(
            name,
            help,
            kind,
            labels.constant().clone(),
            Vec::new(),
        ));
        Self {
            labels,
            metrics: HashMap::new(),
            desc,
            pseudo_len: 0,
        }
    }

    fn len(&self) -> usize {
        if self.pseudo_len > 0 {
            self.pseudo_len
        } else {
            self.metrics.len()
        }
    }

    fn lookup(&self, labels: &Labels) -> Option<Arc<M>> {
        if !self.labels.includes(labels) {
            return None;
        }
        self.metrics.get(&self.labels.hash(labels)).cloned()
    }

    fn rebuild_desc(&mut self) {
        self.desc = Arc::new(Desc::new(
            self.desc.name.clone(),
            self.desc.help.clone(),
            self.desc.kind,
            self.labels.constant().clone(),
            self.labels.names().to_vec(),
        ));
    }

    /// Drop all cells and forget every dynamic key; constants survive.
    fn reset(&mut self) {
        let constant = self.labels.constant().clone();
        self.labels = LabelSet::new(constant);
        self.metrics = HashMap::new();
        self.rebuild_desc();
    }
}

impl<M: Metric> Vector<M> {
    /// Create a vector with an injected cell constructor. The typed
    /// vectors (`CounterVec::new` etc.) are thin wrappers over this;
    /// custom kinds plug in here.
    pub fn with_constructor<F>(opts: Opts, kind: MetricKind, make: F) -> Result<Self>
    where
        F: Fn(CellContext<M>) -> M + Send + Sync + 'static,
    {
        opts.validate()?;
        let name = opts.fq_name();
        let inner = VectorInner::new(&name, &opts.help, kind, opts.const_labels.clone());
        Ok(Self {
            name,
            help: opts.help,
            kind,
            expire: opts.expire,
            max_length: opts.max_length,
            make: Box::new(make),
            inner: Arc::new(RwLock::new(inner)),
        })
    }

    /// Fully-qualified metric name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Help text.
    pub fn help(&self) -> &str {
        &self.help
    }

    /// Metric kind.
    pub fn kind(&self) -> MetricKind {
        self.kind
    }

    /// Expiry duration; zero means never expire.
    pub fn expire(&self) -> Duration {
        self.expire
    }

    /// Cardinality cap; zero means unbounded.
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Return the cell for this label combination, creating it on first
    /// access. At most one cell ever exists per unique combination of
    /// currently-known-key values; concurrent identical requests converge
    /// on a single cell.
    ///
    /// Fails with [`DynaVecError::CapacityExceeded`] when the vector is
    /// already past its cardinality cap; nothing is mutated in that case.
    pub fn get_or_create(&self, labels: &Labels) -> Result<Arc<M>> {
        if let Some(metric) = self.inner.read().lookup(labels) {
            return Ok(metric);
        }

        let mut inner = self.inner.write();
        // Re-check: another writer may have created it between the locks.
        if let Some(metric) = inner.lookup(labels) {
            return Ok(metric);
        }
        if self.max_length > 0 && inner.metrics.len() > self.max_length {
            return Err(DynaVecError::CapacityExceeded {
                vector: self.name.clone(),
                max_length: self.max_length,
            });
        }

        let (values, new_keys) = inner.labels.observe(labels);
        if new_keys {
            inner.rebuild_desc();
        }
        let hash = inner.labels.hash(labels);
        let cell = Arc::new((self.make)(CellContext {
            vector: Arc::downgrade(&self.inner),
            values,
        }));
        inner.metrics.insert(hash, Arc::clone(&cell));
        inner.pseudo_len = 0;

        Ok(cell)
    }

    /// [`Vector::get_or_create`] over positional values: values are
    /// paired with the currently known key names in order. More values
    /// than known names is an error.
    pub fn get_or_create_values(&self, values: &[&str]) -> Result<Arc<M>> {
        let labels = match self.labels_from_values(values) {
            Some(labels) => labels,
            None => {
                return Err(DynaVecError::TooManyValues {
                    given: values.len(),
                    known: self.inner.read().labels.len(),
                })
            }
        };
        self.get_or_create(&labels)
    }

    /// Remove the cell matching this exact label combination. Returns
    /// whether a deletion occurred; label sets that cannot match any
    /// existing cell report `false` rather than erroring.
    pub fn delete(&self, labels: &Labels) -> bool {
        let mut inner = self.inner.write();
        if !inner.labels.includes(labels) {
            return false;
        }
        let hash = inner.labels.hash(labels);
        inner.metrics.remove(&hash).is_some()
    }

    /// [`Vector::delete`] over positional values.
    pub fn delete_values(&self, values: &[&str]) -> bool {
        match self.labels_from_values(values) {
            Some(labels) => self.delete(&labels),
            None => false,
        }
    }

    /// Discard all cells and forget every dynamic key; constants survive.
    /// Cells created afterwards are fresh instances, never revivals.
    pub fn reset(&self) {
        let mut inner = self.inner.write();
        inner.reset();
        tracing::debug!(vector = %self.name, "vector reset");
    }

    /// Housekeeping pass, expected to be driven by an external timer.
    ///
    /// Phase 1 sweeps cells whose last edit is older than the expiry
    /// (skipped when expiry is disabled). Phase 2: if the live count
    /// still exceeds the cardinality cap, the current count is remembered
    /// as the pseudo length and the vector is reset; the count joins the
    /// deleted total.
    pub fn gc(&self) -> GcOutcome {
        let mut inner = self.inner.write();
        let mut outcome = GcOutcome::default();

        if self.expire != Duration::ZERO {
            let before = inner.metrics.len();
            let expire = self.expire;
            inner.metrics.retain(|_, m| m.last_edit().elapsed() <= expire);
            outcome.deleted = before - inner.metrics.len();
            if outcome.deleted > 0 {
                tracing::debug!(
                    vector = %self.name,
                    deleted = outcome.deleted,
                    "expired cells swept"
                );
            }
        }

        if self.max_length > 0 && inner.metrics.len() > self.max_length {
            let length = inner.metrics.len();
            inner.pseudo_len = length;
            inner.reset();
            outcome.deleted += length;
            outcome.limit_exceeded = true;
            tracing::warn!(
                vector = %self.name,
                length,
                max_length = self.max_length,
                "cardinality limit exceeded; vector reset"
            );
        }

        outcome
    }

    /// Snapshot of all live cells: empty while the vector is in an
    /// exceeded-cardinality state, otherwise every cell whose last edit
    /// is within the expiry window (all, when expiry is disabled). The
    /// snapshot is taken under a shared lock; the returned references
    /// need no further store locking to drain.
    pub fn collect(&self) -> Vec<Arc<M>> {
        let inner = self.inner.read();
        if self.max_length > 0 && inner.len() > self.max_length {
            return Vec::new();
        }
        inner
            .metrics
            .values()
            .filter(|m| self.expire == Duration::ZERO || m.last_edit().elapsed() <= self.expire)
            .cloned()
            .collect()
    }

    /// Current schema descriptor.
    pub fn describe(&self) -> Arc<Desc> {
        self.inner.read().desc.clone()
    }

    /// Number of tracked label combinations. Reports the remembered
    /// pseudo length for one cycle after a cardinality-triggered reset.
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pair positional values with known key names, padding the rest
    /// with `""`. `None` when more values than names were given.
    fn labels_from_values(&self, values: &[&str]) -> Option<Labels> {
        let inner = self.inner.read();
        let names = inner.labels.names();
        if values.len() > names.len() {
            return None;
        }
        let mut labels = Labels::new();
        for (i, name) in names.iter().enumerate() {
            let value = values.get(i).copied().unwrap_or_default();
            labels.insert(name.clone(), value.to_string());
        }
        Some(labels)
    }
}

impl<M: Metric> Collector for Vector<M> {
    fn describe(&self) -> Arc<Desc> {
        Vector::describe(self)
    }

    fn collect_samples(&self) -> Vec<Sample> {
        self.collect().iter().map(|m| m.sample()).collect()
    }
}
