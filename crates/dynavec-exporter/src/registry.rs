//! Collector registry.
//!
//! The registry is a collaborator handed to the owning application, not
//! package-level global state; tests construct their own.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use dynavec_core::{Collector, Desc, DynaVecError, Result, Sample};

/// One vector's contribution to a scrape: its descriptor and the samples
/// of its live cells.
#[derive(Debug, Clone)]
pub struct MetricFamily {
    pub desc: Arc<Desc>,
    pub samples: Vec<Sample>,
}

/// Registry of collectors keyed by fully-qualified name.
#[derive(Default)]
pub struct Registry {
    collectors: DashMap<String, Arc<dyn Collector>>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            collectors: DashMap::new(),
        }
    }

    /// Register a collector under its descriptor name. A second collector
    /// with the same name is rejected.
    pub fn register(&self, collector: Arc<dyn Collector>) -> Result<()> {
        let name = collector.describe().name.clone();
        match self.collectors.entry(name) {
            Entry::Occupied(e) => Err(DynaVecError::DuplicateCollector(e.key().clone())),
            Entry::Vacant(e) => {
                e.insert(collector);
                Ok(())
            }
        }
    }

    /// Remove a collector by name. Returns whether one was registered.
    pub fn unregister(&self, name: &str) -> bool {
        self.collectors.remove(name).is_some()
    }

    /// Registered collector names.
    pub fn names(&self) -> Vec<String> {
        self.collectors.iter().map(|e| e.key().clone()).collect()
    }

    /// Snapshot every collector: descriptor plus live samples, sorted by
    /// name for deterministic output.
    pub fn gather(&self) -> Vec<MetricFamily> {
        let mut families: Vec<MetricFamily> = self
            .collectors
            .iter()
            .map(|e| MetricFamily {
                desc: e.value().describe(),
                samples: e.value().collect_samples(),
            })
            .collect();
        families.sort_by(|a, b| a.desc.name.cmp(&b.desc.name));
        families
    }
}
