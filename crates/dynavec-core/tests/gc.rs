//! Expiry sweep, cardinality eviction, and collect gating.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use dynavec_core::{Collector, CounterVec, Labels, MetricValue, Opts};

fn labels(pairs: &[(&str, &str)]) -> Labels {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn counter_vector(expire: Duration, max_length: usize) -> CounterVec {
    CounterVec::new(
        Opts::new("vector", "testing")
            .expire(expire)
            .max_length(max_length),
    )
    .unwrap()
}

#[test]
fn gc_expire_sweeps_untouched_cells() {
    let v = counter_vector(Duration::from_millis(50), 0);

    v.get_or_create(&Labels::new()).unwrap();
    v.get_or_create(&labels(&[("label3", "value3")])).unwrap();

    let outcome = v.gc();
    assert_eq!(outcome.deleted, 0);
    assert!(!outcome.limit_exceeded);
    assert_eq!(v.len(), 2);

    thread::sleep(Duration::from_millis(100));
    let outcome = v.gc();
    assert_eq!(outcome.deleted, 2);
    assert!(!outcome.limit_exceeded);
    assert_eq!(v.len(), 0);
}

#[test]
fn gc_keeps_recently_mutated_cells() {
    let v = counter_vector(Duration::from_millis(100), 0);

    let stale = v.get_or_create(&labels(&[("path", "/old")])).unwrap();
    let live = v.get_or_create(&labels(&[("path", "/hot")])).unwrap();
    stale.inc();
    live.inc();

    thread::sleep(Duration::from_millis(70));
    live.inc();
    thread::sleep(Duration::from_millis(70));

    let outcome = v.gc();
    assert_eq!(outcome.deleted, 1);
    assert_eq!(v.len(), 1);

    let survivors = v.collect();
    assert_eq!(survivors.len(), 1);
    assert!(Arc::ptr_eq(&survivors[0], &live));
}

#[test]
fn gc_disabled_expiry_keeps_everything() {
    let v = counter_vector(Duration::ZERO, 0);

    v.get_or_create(&labels(&[("a", "1")])).unwrap();
    thread::sleep(Duration::from_millis(20));

    assert_eq!(v.gc().deleted, 0);
    assert_eq!(v.len(), 1);
}

#[test]
fn gc_limit_exceeded_resets_everything() {
    let v = counter_vector(Duration::ZERO, 1);

    v.get_or_create(&Labels::new()).unwrap();
    let outcome = v.gc();
    assert_eq!(outcome.deleted, 0);
    assert!(!outcome.limit_exceeded);
    assert_eq!(v.len(), 1);

    v.get_or_create(&labels(&[("label3", "value3")])).unwrap();
    let outcome = v.gc();
    assert_eq!(outcome.deleted, 2);
    assert!(outcome.limit_exceeded);
    // The remembered pre-reset size is reported for one cycle.
    assert_eq!(v.len(), 2);
}

#[test]
fn create_after_cardinality_reset_starts_fresh() {
    let v = counter_vector(Duration::ZERO, 1);

    v.get_or_create(&labels(&[("a", "1")])).unwrap();
    v.get_or_create(&labels(&[("a", "2")])).unwrap();
    assert!(v.gc().limit_exceeded);
    assert_eq!(v.len(), 2);
    assert!(v.collect().is_empty(), "collect yields nothing while exceeded");

    // The next create clears the remembered length and the registry
    // starts numbering from scratch.
    let m = v.get_or_create(&labels(&[("b", "9")])).unwrap();
    assert_eq!(v.len(), 1);
    assert_eq!(v.describe().variable, ["b"]);
    assert_eq!(v.collect().len(), 1);
    assert!(Arc::ptr_eq(&v.collect()[0], &m));
}

#[test]
fn gc_expire_then_under_limit_skips_reset() {
    let v = counter_vector(Duration::from_millis(50), 2);

    v.get_or_create(&labels(&[("a", "1")])).unwrap();
    thread::sleep(Duration::from_millis(100));
    let fresh = v.get_or_create(&labels(&[("a", "2")])).unwrap();
    fresh.inc();

    let outcome = v.gc();
    assert_eq!(outcome.deleted, 1);
    assert!(!outcome.limit_exceeded);
    assert_eq!(v.len(), 1);
}

#[test]
fn collect_normal() {
    let v = counter_vector(Duration::ZERO, 0);

    v.get_or_create(&labels(&[("label3", "value3")])).unwrap();
    v.get_or_create(&labels(&[("label3", "value4")])).unwrap();
    v.get_or_create(&labels(&[("label4", "value4")])).unwrap();

    assert_eq!(v.collect().len(), 3);
}

#[test]
fn collect_skips_expired() {
    let v = counter_vector(Duration::from_millis(50), 0);

    v.get_or_create(&labels(&[("label3", "value3")])).unwrap();
    v.get_or_create(&labels(&[("label4", "value4")])).unwrap();

    assert_eq!(v.collect().len(), 2);
    thread::sleep(Duration::from_millis(100));
    assert_eq!(v.collect().len(), 0);
}

#[test]
fn collect_empty_while_exceeded() {
    let v = counter_vector(Duration::ZERO, 1);

    v.get_or_create(&labels(&[("label3", "value3")])).unwrap();
    v.get_or_create(&labels(&[("label3", "value4")])).unwrap();
    let _ = v.get_or_create(&labels(&[("label4", "value4")]));

    assert_eq!(v.collect().len(), 0);
}

#[test]
fn collect_expands_constant_labels() {
    let v = CounterVec::new(
        Opts::new("vector", "testing")
            .const_labels(labels(&[("env", "prod")]))
            .expire(Duration::from_millis(50)),
    )
    .unwrap();

    v.get_or_create(&labels(&[("path", "/x")])).unwrap();

    let samples = v.collect_samples();
    assert_eq!(samples.len(), 1);
    assert_eq!(samples[0].labels, labels(&[("env", "prod"), ("path", "/x")]));
    assert_eq!(samples[0].value, MetricValue::Counter(0.0));

    thread::sleep(Duration::from_millis(100));
    assert_eq!(v.collect_samples().len(), 0);
}
