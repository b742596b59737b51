//! Collector registry behavior.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;

use dynavec_core::{CounterVec, DynaVecError, GaugeVec, Labels, Opts};
use dynavec_exporter::Registry;

#[test]
fn register_rejects_duplicate_names() {
    let registry = Registry::new();

    let a = Arc::new(CounterVec::new(Opts::new("requests_total", "a")).unwrap());
    let b = Arc::new(CounterVec::new(Opts::new("requests_total", "b")).unwrap());

    registry.register(a).unwrap();
    let err = registry.register(b).expect_err("same fq name must be rejected");
    assert!(matches!(err, DynaVecError::DuplicateCollector(name) if name == "requests_total"));
}

#[test]
fn unregister_frees_the_name() {
    let registry = Registry::new();

    let a = Arc::new(CounterVec::new(Opts::new("requests_total", "a")).unwrap());
    registry.register(a).unwrap();

    assert!(registry.unregister("requests_total"));
    assert!(!registry.unregister("requests_total"));

    let b = Arc::new(CounterVec::new(Opts::new("requests_total", "b")).unwrap());
    registry.register(b).unwrap();
    assert_eq!(registry.names(), ["requests_total"]);
}

#[test]
fn gather_sorts_families_and_snapshots_samples() {
    let registry = Registry::new();

    let gauge = Arc::new(GaugeVec::new(Opts::new("b_inflight", "gauge")).unwrap());
    let counter = Arc::new(CounterVec::new(Opts::new("a_requests_total", "counter")).unwrap());
    registry.register(gauge.clone()).unwrap();
    registry.register(counter.clone()).unwrap();

    counter
        .get_or_create(&Labels::new())
        .unwrap()
        .add(3.0);

    let families = registry.gather();
    assert_eq!(families.len(), 2);
    assert_eq!(families[0].desc.name, "a_requests_total");
    assert_eq!(families[1].desc.name, "b_inflight");
    assert_eq!(families[0].samples.len(), 1);
    assert_eq!(families[1].samples.len(), 0);
}
