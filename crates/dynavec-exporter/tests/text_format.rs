//! Text exposition format assertions.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;

use dynavec_core::{CounterVec, GaugeVec, HistogramVec, Labels, Opts};
use dynavec_exporter::{text, Registry};

fn labels(pairs: &[(&str, &str)]) -> Labels {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn counter_renders_help_type_and_sorted_labels() {
    let registry = Registry::new();
    let v = Arc::new(
        CounterVec::new(
            Opts::new("requests_total", "Requests served")
                .const_labels(labels(&[("env", "prod")])),
        )
        .unwrap(),
    );
    registry.register(v.clone()).unwrap();

    v.get_or_create(&labels(&[("path", "/x"), ("method", "GET")]))
        .unwrap()
        .add(3.0);

    let out = text::encode(&registry.gather());
    assert!(out.contains("# HELP requests_total Requests served\n"));
    assert!(out.contains("# TYPE requests_total counter\n"));
    assert!(out.contains("requests_total{env=\"prod\",method=\"GET\",path=\"/x\"} 3\n"));
}

#[test]
fn gauge_without_labels_renders_bare() {
    let registry = Registry::new();
    let v = Arc::new(GaugeVec::new(Opts::new("up", "Liveness")).unwrap());
    registry.register(v.clone()).unwrap();

    v.get_or_create(&Labels::new()).unwrap().set(1.0);

    let out = text::encode(&registry.gather());
    assert!(out.contains("# TYPE up gauge\n"));
    assert!(out.contains("up 1\n"));
}

#[test]
fn histogram_renders_buckets_sum_and_count() {
    let registry = Registry::new();
    let v = Arc::new(
        HistogramVec::new(
            Opts::new("response_time_seconds", "Response time").buckets(vec![0.5, 5.0]),
        )
        .unwrap(),
    );
    registry.register(v.clone()).unwrap();

    let h = v.get_or_create(&labels(&[("path", "/x")])).unwrap();
    h.observe(0.25);
    h.observe(2.0);
    h.observe(30.0);

    let out = text::encode(&registry.gather());
    assert!(out.contains("# TYPE response_time_seconds histogram\n"));
    assert!(out.contains("response_time_seconds_bucket{path=\"/x\",le=\"0.5\"} 1\n"));
    assert!(out.contains("response_time_seconds_bucket{path=\"/x\",le=\"5\"} 2\n"));
    assert!(out.contains("response_time_seconds_bucket{path=\"/x\",le=\"+Inf\"} 3\n"));
    assert!(out.contains("response_time_seconds_sum{path=\"/x\"} 32.25\n"));
    assert!(out.contains("response_time_seconds_count{path=\"/x\"} 3\n"));
}

#[test]
fn label_values_are_escaped() {
    let registry = Registry::new();
    let v = Arc::new(CounterVec::new(Opts::new("events_total", "Events")).unwrap());
    registry.register(v.clone()).unwrap();

    v.get_or_create(&labels(&[("message", "a\"b\\c\nd")]))
        .unwrap()
        .inc();

    let out = text::encode(&registry.gather());
    assert!(out.contains("events_total{message=\"a\\\"b\\\\c\\nd\"} 1\n"));
}

#[test]
fn family_with_no_samples_still_renders_schema() {
    let registry = Registry::new();
    let v = Arc::new(CounterVec::new(Opts::new("idle_total", "Idle")).unwrap());
    registry.register(v).unwrap();

    let out = text::encode(&registry.gather());
    assert!(out.contains("# HELP idle_total Idle\n"));
    assert!(out.contains("# TYPE idle_total counter\n"));
    assert!(!out.contains("idle_total{"));
}
